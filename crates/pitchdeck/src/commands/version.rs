use colored::Colorize;

pub fn run() {
    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bold(),
        env!("CARGO_PKG_VERSION")
    );
    let audio = if cfg!(feature = "audio") {
        "enabled".green()
    } else {
        "disabled (built with --no-default-features)".yellow()
    };
    println!("  audio playback: {audio}");
}
