//! `gpar decode`: reads a bitstream back into a device and lists the state
//! of every entity.

use std::path::Path;

use gpar_device::{BitstreamEntity, Device, DeviceError, Part};
use gpar_diagnostics::{Diagnostic, DiagnosticSink, Location};
use gpar_pnr::PnrError;

use crate::pipeline::{render_diagnostics, status};
use crate::{DecodeArgs, GlobalArgs, ReportFormat};

/// Runs the `gpar decode` command. Returns exit code 0 on success, 1 when
/// the bits decode to no valid state.
pub fn run(args: &DecodeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let part: Part = args.part.parse()?;
    let mut device = Device::new(part);
    let sink = DiagnosticSink::new();

    status(global, "Decoding", format!("{} as {part}", args.bitstream));
    match device.read_from_file(Path::new(&args.bitstream), &sink) {
        Ok(()) => {}
        Err(DeviceError::Entity(err)) => {
            let err = PnrError::from(err);
            sink.emit(Diagnostic::error(
                err.code(),
                err.to_string(),
                Location::File(args.bitstream.clone()),
            ));
            render_diagnostics(&sink.take_all(), global, ReportFormat::Text);
            return Ok(1);
        }
        Err(other) => return Err(other.into()),
    }
    render_diagnostics(&sink.take_all(), global, ReportFormat::Text);

    for line in listing(&device, args.all) {
        println!("{line}");
    }
    Ok(0)
}

/// One line per entity: its description, then its state.
pub fn listing(device: &Device, all: bool) -> Vec<String> {
    device
        .entities()
        .iter()
        .filter(|e| all || e.is_configured())
        .map(|e| format!("{:<10} {}", e.description(), e.summary()))
        .collect()
}
