use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR: &str = "Proctor Watch";

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "model {name} not found (searched: {}). {instructions}",
        searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )]
    NotFound {
        name: String,
        searched: Vec<PathBuf>,
        instructions: String,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't send Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where a model comes from when it isn't already on disk.
#[derive(Clone, Copy, Debug)]
pub enum ModelOrigin<'a> {
    Download(&'a str),
    /// Supplied by the user; `instructions` is shown when it's missing.
    Manual { instructions: &'a str },
}

/// Locates a model file, downloading it into the cache when it has a URL.
///
/// Lookup order: user cache directory, then `bundled_dir`, then `origin`.
pub fn resolve(
    name: &str,
    origin: ModelOrigin<'_>,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    resolve_in(&cache_dir, name, origin, bundled_dir, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    origin: ModelOrigin<'_>,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let candidates: Vec<PathBuf> = std::iter::once(cache_dir.join(name))
        .chain(bundled_dir.map(|d| d.join(name)))
        .collect();
    if let Some(found) = candidates.iter().find(|p| p.is_file()) {
        log::debug!("Using model at {}", found.display());
        return Ok(found.clone());
    }

    let url = match origin {
        ModelOrigin::Download(url) => url,
        ModelOrigin::Manual { instructions } => {
            return Err(ModelResolveError::NotFound {
                name: name.to_string(),
                searched: candidates,
                instructions: instructions.to_string(),
            })
        }
    };

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    let dest = cache_dir.join(name);
    log::info!("Downloading {name} from {url}");
    download(url, &dest, progress)?;
    Ok(dest)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Proctor Watch/models/`
/// - Linux: `$XDG_CACHE_HOME/Proctor Watch/models/` or `~/.cache/Proctor Watch/models/`
/// - Windows: `%LOCALAPPDATA%/Proctor Watch/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join(APP_DIR).join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);

    // Written to a sibling temp file and renamed so a failed download never
    // leaves a truncated model behind.
    let temp_path = dest.with_extension("part");
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ModelResolveError::Write { path, source }
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;

    let mut buf = vec![0u8; 1024 * 1024];
    let mut downloaded: u64 = 0;
    let copied = loop {
        let n = match response.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => n,
            Err(e) => break Err(write_err(&temp_path)(e)),
        };
        if let Err(e) = file.write_all(&buf[..n]) {
            break Err(write_err(&temp_path)(e));
        }
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    };
    let flushed = copied.and_then(|()| file.flush().map_err(write_err(&temp_path)));
    drop(file);

    if let Err(e) = flushed {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    fs::rename(&temp_path, dest).map_err(write_err(dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANUAL: ModelOrigin<'static> = ModelOrigin::Manual {
        instructions: "Copy m.onnx into the models directory.",
    };

    #[test]
    fn test_resolve_prefers_cache() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&cache).unwrap();
        fs::create_dir_all(&bundled).unwrap();
        fs::write(cache.join("m.onnx"), b"cached").unwrap();
        fs::write(bundled.join("m.onnx"), b"bundled").unwrap();

        let path = resolve_in(&cache, "m.onnx", MANUAL, Some(&bundled), None).unwrap();
        assert_eq!(path, cache.join("m.onnx"));
    }

    #[test]
    fn test_resolve_falls_back_to_bundled() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&bundled).unwrap();
        fs::write(bundled.join("m.onnx"), b"bundled").unwrap();

        let path = resolve_in(&cache, "m.onnx", MANUAL, Some(&bundled), None).unwrap();
        assert_eq!(path, bundled.join("m.onnx"));
    }

    #[test]
    fn test_missing_manual_model_reports_locations_and_instructions() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");

        let err = resolve_in(&cache, "m.onnx", MANUAL, Some(&bundled), None).unwrap_err();
        match &err {
            ModelResolveError::NotFound { name, searched, .. } => {
                assert_eq!(name, "m.onnx");
                assert_eq!(searched, &vec![cache.join("m.onnx"), bundled.join("m.onnx")]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let message = err.to_string();
        assert!(message.contains(&bundled.join("m.onnx").display().to_string()));
        assert!(message.ends_with("Copy m.onnx into the models directory."));
    }

    #[test]
    fn test_model_cache_dir_is_app_scoped() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR));
        assert!(path.ends_with("models"));
    }

    #[test]
    fn test_failed_download_leaves_no_files() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.onnx");
        let result = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
