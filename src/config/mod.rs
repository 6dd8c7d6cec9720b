use std::{
    collections::HashMap,
    env,
    fs,
    path::PathBuf,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;

use crate::cli::Cli;
use crate::coordinator::RunMode;
use crate::script::ScriptSource;

const DEFAULT_SOURCES: &[&str] = &[
    "https://raw.githubusercontent.com/micro-business/AddressService/master/DatabaseScript.cql",
    "https://raw.githubusercontent.com/micro-business/TenantService/master/DatabaseScript.cql",
    "https://raw.githubusercontent.com/micro-business/UserService/master/DatabaseScript.cql",
];

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .cqlrunnerrc if exists
        if let Ok(text) = fs::read_to_string(&config_path) {
            map.extend(parse_rc(&text));
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    /// Environment values were already folded in by `load`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Result<u64> {
        let raw = self.get(key).unwrap_or_default();
        raw.trim()
            .parse::<u64>()
            .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw))
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key).map(|v| split_list(&v)).unwrap_or_default()
    }
}

/// Connection settings for the target cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub hosts: Vec<String>,
    pub protocol_version: u8,
    pub request_timeout: Duration,
}

/// Everything one run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub cluster: ClusterConfig,
    pub mode: RunMode,
    pub sources: Vec<ScriptSource>,
    pub fetch_timeout: Duration,
}

impl RunConfig {
    /// CLI flags override the rc file and environment.
    pub fn resolve(args: &Cli, cfg: &Config) -> Result<Self> {
        let hosts = match args.cassandra_hosts.as_deref() {
            Some(list) => split_list(list),
            None => cfg.get_list("CASSANDRA_HOSTS"),
        };
        if hosts.is_empty() {
            bail!("no cassandra hosts configured");
        }

        let protocol_version = match args.cassandra_protocol_version {
            Some(v) => v,
            None => {
                let v = cfg.get_u64("CASSANDRA_PROTOCOL_VERSION")?;
                u8::try_from(v).with_context(|| format!("protocol version {} is out of range", v))?
            }
        };

        let request_timeout = match args.request_timeout {
            Some(secs) => secs,
            None => cfg.get_u64("REQUEST_TIMEOUT")?,
        };
        let fetch_timeout = match args.fetch_timeout {
            Some(secs) => secs,
            None => cfg.get_u64("FETCH_TIMEOUT")?,
        };

        let sources: Vec<ScriptSource> = if !args.scripts.is_empty() {
            args.scripts.iter().map(|s| ScriptSource::new(s.trim())).collect()
        } else {
            cfg.get_list("SCRIPT_SOURCES").into_iter().map(ScriptSource::from).collect()
        };
        if sources.is_empty() {
            bail!("no script sources configured");
        }

        let parallel = args.run_in_parallel || cfg.get_bool("RUN_IN_PARALLEL");

        Ok(Self {
            cluster: ClusterConfig {
                hosts,
                protocol_version,
                request_timeout: Duration::from_secs(request_timeout),
            },
            mode: RunMode::from_flag(parallel),
            sources,
            fetch_timeout: Duration::from_secs(fetch_timeout),
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_rc(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "CASSANDRA_HOSTS",
        "CASSANDRA_PROTOCOL_VERSION",
        "RUN_IN_PARALLEL",
        "SCRIPT_SOURCES",
        "REQUEST_TIMEOUT",
        "FETCH_TIMEOUT",
    ];

    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    if let Some(p) = env::var_os("CQL_RUNNER_CONFIG") {
        return PathBuf::from(p);
    }
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("cql_runner").join(".cqlrunnerrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("CASSANDRA_HOSTS".into(), "127.0.0.1".into());
    m.insert("CASSANDRA_PROTOCOL_VERSION".into(), "4".into());
    m.insert("RUN_IN_PARALLEL".into(), "false".into());
    m.insert("SCRIPT_SOURCES".into(), DEFAULT_SOURCES.join(","));

    // Seconds
    m.insert("REQUEST_TIMEOUT".into(), "10".into());
    m.insert("FETCH_TIMEOUT".into(), "60".into());

    m
}

#[cfg(test)]
impl Config {
    pub(crate) fn from_rc(text: &str) -> Self {
        let mut inner = default_map();
        inner.extend(parse_rc(text));
        Self { inner, config_path: PathBuf::from(".cqlrunnerrc") }
    }
}
