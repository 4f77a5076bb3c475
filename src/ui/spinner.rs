use std::future::Future;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown on stderr while a request is outstanding. Hidden when
/// stderr is not a terminal.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = if console::Term::stderr().is_term() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    let spinner_style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .expect("progress bar template is a valid static string");
    bar.set_style(spinner_style);
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Await `fut` behind a spinner, clearing it when done.
pub async fn with_spinner<F, T>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let bar = spinner(format!("{}", style(message).dim()));
    let out = fut.await;
    bar.finish_and_clear();
    out
}
