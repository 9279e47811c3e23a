mod styling;
mod summary;
mod tables;

pub use styling::{dim, magenta_bold};
pub use summary::print_summary;

/// Prints the copilot-looper banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔁 copilot-looper"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Workflow results for Copilot pull requests")
    );
}
