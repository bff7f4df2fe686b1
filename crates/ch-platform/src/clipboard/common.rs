use anyhow::{anyhow, Context, Result};
use ch_core::clipboard::{ClipboardRepresentation, MimeType, ObservedRepresentation};
use ch_core::SystemClipboardSnapshot;
use clipboard_rs::{common::RustImage, Clipboard, ClipboardContent, ContentFormat, RustImageData};
use std::collections::HashSet;
use tracing::debug;

/// Format names clipboard-rs reads through typed accessors.
const TEXT: &str = "text";
const RTF: &str = "rtf";
const HTML: &str = "html";
const FILES: &str = "files";
const IMAGE: &str = "image";

/// X11 selection bookkeeping targets; they describe the selection rather
/// than hold content.
const META_TARGETS: &[&str] = &["TARGETS", "TIMESTAMP", "MULTIPLE", "SAVE_TARGETS", "DELETE"];

fn map_clipboard_err<T>(
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T> {
    result.map_err(|e| anyhow!(e))
}

fn observe<T>(
    format_id: &str,
    mime: MimeType,
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
    into_bytes: impl FnOnce(T) -> Result<Vec<u8>>,
) -> ObservedRepresentation {
    match map_clipboard_err(result).and_then(into_bytes) {
        Ok(bytes) => ObservedRepresentation::ready(format_id, Some(mime), bytes),
        Err(err) => {
            debug!(format_id, error = %err, "advertised clipboard format unreadable");
            ObservedRepresentation::unreadable(format_id, Some(mime), err.to_string())
        }
    }
}

pub(crate) fn read_snapshot(ctx: &clipboard_rs::ClipboardContext) -> Result<SystemClipboardSnapshot> {
    let available = map_clipboard_err(ctx.available_formats()).context("list clipboard formats")?;

    let mut reps = Vec::new();

    if ctx.has(ContentFormat::Text) {
        reps.push(observe(TEXT, MimeType::text_plain(), ctx.get_text(), |text| {
            Ok(text.into_bytes())
        }));
    }

    if ctx.has(ContentFormat::Rtf) {
        reps.push(observe(RTF, MimeType::text_rtf(), ctx.get_rich_text(), |rtf| {
            Ok(rtf.into_bytes())
        }));
    }

    if ctx.has(ContentFormat::Html) {
        reps.push(observe(HTML, MimeType::text_html(), ctx.get_html(), |html| {
            Ok(html.into_bytes())
        }));
    }

    if ctx.has(ContentFormat::Files) {
        reps.push(observe(FILES, MimeType::uri_list(), ctx.get_files(), |files| {
            Ok(files.join("\n").into_bytes())
        }));
    }

    if ctx.has(ContentFormat::Image) {
        reps.push(observe(IMAGE, MimeType::image_png(), ctx.get_image(), |img| {
            let png = map_clipboard_err(img.to_png()).context("encode clipboard image as png")?;
            Ok(png.get_bytes().to_vec())
        }));
    }

    // Everything else is kept as an opaque blob.
    let mut seen: HashSet<String> = reps.iter().map(|r| r.format_id.to_string()).collect();
    for format_id in available {
        if META_TARGETS.contains(&format_id.as_str()) || !seen.insert(format_id.clone()) {
            continue;
        }
        let rep = match ctx.get_buffer(&format_id) {
            Ok(buf) => ObservedRepresentation::ready(format_id, None, buf),
            Err(err) => {
                debug!(format_id = %format_id, error = %err, "raw clipboard format unreadable");
                ObservedRepresentation::unreadable(format_id, None, err.to_string())
            }
        };
        reps.push(rep);
    }

    Ok(SystemClipboardSnapshot::new(
        chrono::Utc::now().timestamp_millis(),
        reps,
    ))
}

/// Maps representations onto clipboard-rs contents for one `set` call.
///
/// Canonical names go through the typed clipboard-rs variants; any other
/// format is written back verbatim under its platform name.
pub(crate) fn to_clipboard_contents(
    representations: &[ClipboardRepresentation],
) -> Result<Vec<ClipboardContent>> {
    let mut contents = Vec::with_capacity(representations.len());
    for rep in representations {
        let text = || String::from_utf8_lossy(&rep.bytes).into_owned();
        let content = match rep.format_id.as_str() {
            TEXT => ClipboardContent::Text(text()),
            RTF => ClipboardContent::Rtf(text()),
            HTML => ClipboardContent::Html(text()),
            FILES => ClipboardContent::Files(text().lines().map(str::to_string).collect()),
            IMAGE => {
                let img = map_clipboard_err(RustImageData::from_bytes(&rep.bytes))
                    .context("decode image for clipboard write")?;
                ClipboardContent::Image(img)
            }
            other => ClipboardContent::Other(other.to_string(), rep.bytes.clone()),
        };
        contents.push(content);
    }
    Ok(contents)
}

pub(crate) fn write_representations(
    ctx: &clipboard_rs::ClipboardContext,
    representations: &[ClipboardRepresentation],
) -> Result<()> {
    let contents = to_clipboard_contents(representations)?;
    map_clipboard_err(ctx.set(contents)).context("set clipboard contents")
}
