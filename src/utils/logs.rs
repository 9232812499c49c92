// setup_tracing installs the global subscriber. Logs go to stderr because stdout belongs
// to the interactive menu; `json` switches to one JSON object per line.
pub fn setup_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
