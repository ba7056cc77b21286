use tracing_subscriber::EnvFilter;

pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init so embedding applications keep their own subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
