use crate::Outcome;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::message::AttachmentPayload;
use crate::errors::{AppError, AppResult};
use crate::report::grid::XlsxDecoder;
use crate::report::{PageGeometry, RenderOptions, build_pdf};
use crate::ui::messages::{info, success};
use crate::utils::path::{ensure_writable, expand_tilde};
use std::fs;

/// Offline rendering of local spreadsheet files.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<Outcome> {
    let Commands::Render {
        inputs,
        output,
        force,
        repeat_header,
    } = cmd
    else {
        return Ok(Outcome::Done);
    };

    let out_path = expand_tilde(output);
    ensure_writable(&out_path, *force)?;

    let mut payloads = Vec::with_capacity(inputs.len());
    for input in inputs {
        let path = expand_tilde(input);
        let bytes = fs::read(&path)
            .map_err(|e| AppError::Other(format!("cannot read {}: {e}", path.display())))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| input.clone());
        info(format!("Loaded {filename} ({} bytes)", bytes.len()));
        payloads.push(AttachmentPayload { filename, bytes });
    }

    let opts = RenderOptions {
        repeat_header: *repeat_header || cfg.layout.repeat_header,
    };
    let pdf = build_pdf(&payloads, &XlsxDecoder, &PageGeometry::default(), &opts)?;

    fs::write(&out_path, &pdf.bytes)?;
    success(format!(
        "PDF written to {} ({} page(s))",
        out_path.display(),
        pdf.pages
    ));

    Ok(Outcome::Done)
}
