use log::LevelFilter;

/// Level picked from the `-v`/`-q` flags. `RUST_LOG` still wins when set.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbose: u8, quiet: bool) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for(verbose, quiet))
        // wgpu and winit are chatty at debug
        .filter_module("wgpu_core", LevelFilter::Warn)
        .filter_module("wgpu_hal", LevelFilter::Warn)
        .filter_module("naga", LevelFilter::Warn)
        .filter_module("winit", LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(0, false), LevelFilter::Warn);
        assert_eq!(level_for(1, false), LevelFilter::Debug);
        assert_eq!(level_for(4, false), LevelFilter::Trace);
        assert_eq!(level_for(2, true), LevelFilter::Error);
    }
}
