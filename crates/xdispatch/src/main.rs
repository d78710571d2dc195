#![allow(clippy::multiple_crate_versions)]

//! xdispatch - replays decoded X11 event scripts through the dispatch core.

fn main() {
    if let Err(err) = xdispatch::cli::run() {
        eprintln!("xdispatch: {err}");
        std::process::exit(1);
    }
}
