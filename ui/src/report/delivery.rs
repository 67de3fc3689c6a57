//! Handing a finished report to the user: a browser download on web, a file in
//! the app's export directory on desktop.

use time::{macros::format_description, OffsetDateTime};
use tracing::info;

use super::ExportError;

pub const PDF_MIME: &str = "application/pdf";

pub trait ReportSink {
    /// Deliver `bytes` under `filename`. Returns the saved path when the sink
    /// writes to disk, `None` when the platform takes over (browser download).
    fn deliver(
        &mut self,
        filename: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Option<String>, ExportError>;
}

/// `<prefix>-YYYYMMDD_HHMMSS.pdf`
pub fn report_filename(prefix: &str, now: OffsetDateTime) -> String {
    let stamp = now
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "export".into());
    format!("{prefix}-{stamp}.pdf")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformSink;

impl ReportSink for PlatformSink {
    fn deliver(
        &mut self,
        filename: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Option<String>, ExportError> {
        let delivered = download_bytes(filename, mime, bytes).map_err(ExportError::Delivery)?;
        info!(filename, path = ?delivered, "report delivered");
        Ok(delivered)
    }
}

fn download_bytes(filename: &str, mime: &str, bytes: Vec<u8>) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = mime;
        let dir = desktop_export_dir()?;
        std::fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        std::fs::write(&path, &bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "Paddock", "Paddock")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn filename_carries_prefix_and_timestamp() {
        let now = datetime!(2024-03-09 14:05:07 UTC);
        assert_eq!(
            report_filename("paddock-report", now),
            "paddock-report-20240309_140507.pdf"
        );
    }
}
