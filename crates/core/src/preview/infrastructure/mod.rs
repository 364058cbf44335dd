pub mod headless_preview;
#[cfg(feature = "preview-window")]
pub mod window_preview;
