use std::path::PathBuf;

#[cfg(feature = "desktop")]
pub fn pick_submission_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_title("Pilih berkas kiriman data")
        .pick_file()
}

#[cfg(not(feature = "desktop"))]
pub fn pick_submission_file() -> Option<PathBuf> {
    None
}
