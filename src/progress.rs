pub use indicatif::ProgressBar;
use indicatif::ProgressStyle;

/// Progress over a number of chromosomes
pub fn chromosomes(count: usize) -> ProgressBar {
    let progress = ProgressBar::new(count as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{wide_bar} {pos}/{len} chromosomes [{elapsed} elapsed; {eta} left]"),
    );

    progress
}
