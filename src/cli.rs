use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "cql-runner", about = "Apply remote CQL scripts to a Cassandra cluster", version)]
pub struct Cli {
    /// Comma-separated list of cassandra hosts to connect to [config: CASSANDRA_HOSTS, default 127.0.0.1].
    #[arg(long = "cassandra-hosts", value_name = "HOSTS")]
    pub cassandra_hosts: Option<String>,

    /// CQL native protocol version [config: CASSANDRA_PROTOCOL_VERSION, default 4].
    #[arg(long = "cassandra-protocol-version", value_name = "N")]
    pub cassandra_protocol_version: Option<u8>,

    /// Run all scripts at once and report every failure, instead of one by one stopping at the first.
    /// [config: RUN_IN_PARALLEL; only "true" (any case) enables it, values like 1 or yes do not]
    #[arg(long = "run-in-parallel")]
    pub run_in_parallel: bool,

    /// Script to apply (URL, file:// URL or path). Repeat to apply several; replaces SCRIPT_SOURCES.
    #[arg(long = "script", value_name = "LOCATOR", action = clap::ArgAction::Append)]
    pub scripts: Vec<String>,

    /// Per-statement timeout in seconds [config: REQUEST_TIMEOUT, default 10].
    #[arg(long = "request-timeout", value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Script download timeout in seconds [config: FETCH_TIMEOUT, default 60].
    #[arg(long = "fetch-timeout", value_name = "SECS")]
    pub fetch_timeout: Option<u64>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
