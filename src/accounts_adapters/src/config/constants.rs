pub mod env {
    pub const ENV_PREFIX: &str = "ACCOUNTS";
    pub const ENV_SEPARATOR: &str = "__";
}

pub mod files {
    pub const DEFAULT_CONFIG_FILE: &str = "config/default";
    pub const LOCAL_CONFIG_FILE: &str = "config/local";
}

pub mod defaults {
    pub const LOCKOUT_MAX_ATTEMPTS: u32 = 5;
    pub const LOCKOUT_DURATION_SECS: u64 = 15 * 60;
    pub const LOG_FILTER: &str = "info";
}
