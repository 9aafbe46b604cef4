use std::time::Duration;

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum CargoEnv {
    Development,
    Production,
}

#[derive(clap::Parser, Clone, Debug)]
pub struct AppConfig {
    // production or development
    #[clap(long, env, value_enum)]
    pub cargo_env: CargoEnv,

    // port that the app will bind to
    #[clap(long, env, default_value = "5000")]
    pub port: u16,

    // this should be either * for allowing everything, or a comma seperated list of domains like
    // example.com,something.com
    #[clap(long, env, default_value = "*")]
    pub cors_origin: String,

    // optional sentry integration
    #[clap(long, env)]
    pub sentry_dsn: Option<String>,

    // graphql api of the aggregator, the /api path gets added on request
    #[clap(long, env, default_value = "https://api.allanime.day")]
    pub upstream_api_url: String,

    // host that relative provider locators get joined onto
    #[clap(long, env, default_value = "allanime.day")]
    pub upstream_base_host: String,

    // the api rejects requests that don't look like they came from its own front end so these two
    // should only be changed if the upstream changes them
    #[clap(long, env, default_value = "https://allmanga.to")]
    pub upstream_referer: String,

    #[clap(
        long,
        env,
        default_value = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0"
    )]
    pub upstream_user_agent: String,

    // per request timeout for anything sent upstream
    #[clap(long, env, default_value = "30")]
    pub upstream_timeout_secs: u64,

    // how many full attempts a resolve gets before giving up
    #[clap(long, env, default_value = "10")]
    pub max_attempts: u32,

    // fixed wait between attempts
    #[clap(long, env, default_value = "2000")]
    pub retry_delay_ms: u64,

    // hard cap for one resolve request, retries included
    #[clap(long, env, default_value = "120")]
    pub resolve_timeout_secs: u64,

    // used when a request doesn't pass ?quality=
    #[clap(long, env, default_value = "best")]
    pub default_quality: String,

    // fetch providers one after another instead of all at once
    #[clap(long, env)]
    pub sequential_providers: bool,
}

impl Default for AppConfig {
    // defaults aren't really needed here but it's here as a bad fallback
    fn default() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            port: 5000,
            cors_origin: "*".to_string(),
            sentry_dsn: None,
            upstream_api_url: "https://api.allanime.day".to_string(),
            upstream_base_host: "allanime.day".to_string(),
            upstream_referer: "https://allmanga.to".to_string(),
            upstream_user_agent:
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0"
                    .to_string(),
            upstream_timeout_secs: 30,
            max_attempts: 10,
            retry_delay_ms: 2000,
            resolve_timeout_secs: 120,
            default_quality: "best".to_string(),
            sequential_providers: false,
        }
    }
}

/// the part of the config the upstream client cares about
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub base_host: String,
    pub referer: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl From<&AppConfig> for UpstreamConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_url: config.upstream_api_url.trim_end_matches('/').to_string(),
            base_host: config.upstream_base_host.clone(),
            referer: config.upstream_referer.clone(),
            user_agent: config.upstream_user_agent.clone(),
            timeout_secs: config.upstream_timeout_secs,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// retry and fan-out knobs for the resolution pipeline
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub base_host: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub resolve_timeout: Duration,
    pub sequential_providers: bool,
}

impl From<&AppConfig> for ResolverConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_host: config.upstream_base_host.clone(),
            max_attempts: config.max_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            resolve_timeout: Duration::from_secs(config.resolve_timeout_secs),
            sequential_providers: config.sequential_providers,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}
