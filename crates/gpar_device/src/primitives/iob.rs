//! Pin I/O buffers.
//!
//! Configuration bits, relative to the site's base:
//!
//! | bits | field |
//! |------|-------|
//! | 0-1  | input mode (normal, Schmitt, low-voltage, analog) |
//! | 2-3  | drive type (push-pull, NMOS open drain, PMOS open drain) |
//! | 4    | 2X drive strength |
//! | 5-6  | pull resistor (none, 10k, 100k, 1M) |
//! | 7    | pull direction (set = up) |

use crate::bitstream::Bitstream;
use crate::entity::{
    load_inputs, save_inputs, unknown_port, BitstreamEntity, CommitContext, EntityKind,
    EntityLocation, EntityOutput, LoadContext, PortRole, SaveContext,
};
use crate::error::EntityError;
use crate::layout::IobSite;
use std::fmt;

const CONFIG_LEN: usize = 8;

/// Input buffer flavour.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    /// Standard digital input.
    #[default]
    Normal,
    /// Digital input with hysteresis.
    Schmitt,
    /// Low-threshold digital input.
    LowVoltage,
    /// Analog input; the digital buffer is off.
    Analog,
}

/// Output driver topology.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DriveType {
    /// Drives both levels.
    #[default]
    PushPull,
    /// Pulls low only.
    NmosOpenDrain,
    /// Pulls high only.
    PmosOpenDrain,
}

/// Pull resistor value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PullResistor {
    /// No pull.
    #[default]
    None,
    /// 10 kΩ.
    R10k,
    /// 100 kΩ.
    R100k,
    /// 1 MΩ.
    R1M,
}

impl PullResistor {
    fn parse(text: &str) -> Option<Self> {
        match text.trim_start_matches("PULL_") {
            "NONE" | "0" => Some(PullResistor::None),
            "10K" => Some(PullResistor::R10k),
            "100K" => Some(PullResistor::R100k),
            "1M" => Some(PullResistor::R1M),
            _ => None,
        }
    }
}

impl fmt::Display for PullResistor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PullResistor::None => "none",
            PullResistor::R10k => "10k",
            PullResistor::R100k => "100k",
            PullResistor::R1M => "1M",
        })
    }
}

/// Which rail the pull resistor ties to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PullDirection {
    /// Towards ground.
    #[default]
    Down,
    /// Towards Vdd.
    Up,
}

/// A pin's I/O buffer.
#[derive(Clone, Debug)]
pub struct Iob {
    index: usize,
    site: IobSite,
    out: EntityOutput,
    oe: EntityOutput,
    /// Input buffer flavour.
    pub input_mode: InputMode,
    /// Output driver topology.
    pub drive_type: DriveType,
    /// Whether the output uses double drive strength.
    pub double_drive: bool,
    /// Pull resistor value.
    pub pull: PullResistor,
    /// Pull resistor direction.
    pub pull_direction: PullDirection,
}

impl Iob {
    pub(crate) fn new(index: usize, site: IobSite) -> Self {
        Self {
            index,
            site,
            out: EntityOutput::None,
            oe: EntityOutput::None,
            input_mode: InputMode::default(),
            drive_type: DriveType::default(),
            double_drive: false,
            pull: PullResistor::default(),
            pull_direction: PullDirection::default(),
        }
    }

    /// The package pin number.
    pub fn pin(&self) -> u32 {
        self.site.pin
    }

    /// Whether the output driver can ever be enabled.
    pub fn is_output(&self) -> bool {
        !self.oe.is_ground_or_none()
    }
}

impl BitstreamEntity for Iob {
    fn kind(&self) -> EntityKind {
        EntityKind::Iob
    }

    fn index(&self) -> usize {
        self.index
    }

    fn location(&self) -> EntityLocation {
        EntityLocation {
            matrix: self.site.matrix,
            input_base: Some(self.site.input_base),
            output: Some((self.site.matrix, self.site.output_word)),
            config_base: Some(self.site.config_base),
        }
    }

    fn description(&self) -> String {
        format!("IOB_P{}", self.site.pin)
    }

    fn primitive_name(&self) -> &'static str {
        match self.oe {
            EntityOutput::Rail(true) => "GP_OBUF",
            EntityOutput::Port { .. } => "GP_IOBUF",
            _ => "GP_IBUF",
        }
    }

    fn accepts_primitive(&self, cell_type: &str) -> bool {
        matches!(cell_type, "GP_IBUF" | "GP_OBUF" | "GP_OBUFT" | "GP_IOBUF")
    }

    fn config_len(&self) -> usize {
        CONFIG_LEN
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["OUT", "OE"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["IN"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        match port {
            "OUT" => Some(self.out),
            "OE" => Some(self.oe),
            _ => None,
        }
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        match port {
            "OUT" => self.out = source,
            "OE" => self.oe = source,
            _ => return Err(unknown_port(&self.description(), port)),
        }
        Ok(())
    }

    fn cell_port_role(&self, cell_type: &str, port: &str, bit: usize) -> PortRole {
        if bit != 0 {
            return PortRole::Unknown;
        }
        match (cell_type, port) {
            ("GP_IBUF", "IN") => PortRole::Pad,
            ("GP_IBUF", "OUT") => PortRole::Output("IN"),
            ("GP_OBUF" | "GP_OBUFT" | "GP_IOBUF", "IN") => PortRole::Input("OUT"),
            ("GP_OBUF" | "GP_OBUFT", "OUT") => PortRole::Pad,
            ("GP_OBUFT" | "GP_IOBUF", "OE") => PortRole::Input("OE"),
            ("GP_IOBUF", "OUT") => PortRole::Output("IN"),
            ("GP_IOBUF", "IO") => PortRole::Pad,
            _ => PortRole::Unknown,
        }
    }

    fn known_parameters(&self) -> &'static [&'static str] {
        &[
            "PULLUP",
            "PULLDOWN",
            "DRIVE_STRENGTH",
            "DRIVE_TYPE",
            "SCHMITT_TRIGGER",
            "IBUF_TYPE",
            "LOC",
        ]
    }

    fn is_configured(&self) -> bool {
        !self.out.is_ground_or_none()
            || !self.oe.is_ground_or_none()
            || self.input_mode != InputMode::Normal
            || self.drive_type != DriveType::PushPull
            || self.double_drive
            || self.pull != PullResistor::None
            || self.pull_direction != PullDirection::Down
    }

    fn summary(&self) -> String {
        let dir = match self.pull_direction {
            PullDirection::Down => "down",
            PullDirection::Up => "up",
        };
        format!(
            "pin {}: OUT={} OE={} input={:?} drive={:?}{} pull={} {dir}",
            self.site.pin,
            self.out,
            self.oe,
            self.input_mode,
            self.drive_type,
            if self.double_drive { " 2X" } else { " 1X" },
            self.pull,
        )
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        ctx.warn_unknown(&name, self.known_parameters());

        if ctx.cell.is_some_and(|c| c.cell_type == "GP_OBUF") {
            self.oe = EntityOutput::VDD;
        }

        let parse_pull = |key: &str| -> Result<Option<PullResistor>, EntityError> {
            match ctx.param_text(key) {
                None => Ok(None),
                Some(text) => PullResistor::parse(&text).map(Some).ok_or_else(|| {
                    EntityError::drc(&name, format!("{key} must be 10k, 100k or 1M, got {text}"))
                }),
            }
        };
        let up = parse_pull("PULLUP")?.filter(|p| *p != PullResistor::None);
        let down = parse_pull("PULLDOWN")?.filter(|p| *p != PullResistor::None);
        match (up, down) {
            (Some(_), Some(_)) => {
                return Err(EntityError::drc(&name, "PULLUP and PULLDOWN are both set"));
            }
            (Some(r), None) => {
                self.pull = r;
                self.pull_direction = PullDirection::Up;
            }
            (None, Some(r)) => {
                self.pull = r;
                self.pull_direction = PullDirection::Down;
            }
            (None, None) => {}
        }

        if let Some(text) = ctx.param_text("DRIVE_STRENGTH") {
            self.double_drive = match text.as_str() {
                "1X" => false,
                "2X" => true,
                _ => {
                    return Err(EntityError::drc(
                        &name,
                        format!("DRIVE_STRENGTH must be 1X or 2X, got {text}"),
                    ))
                }
            };
        }

        if let Some(text) = ctx.param_text("DRIVE_TYPE") {
            self.drive_type = match text.as_str() {
                "PUSHPULL" => DriveType::PushPull,
                "NMOS_OD" => DriveType::NmosOpenDrain,
                "PMOS_OD" => DriveType::PmosOpenDrain,
                _ => {
                    return Err(EntityError::drc(
                        &name,
                        format!("DRIVE_TYPE must be PUSHPULL, NMOS_OD or PMOS_OD, got {text}"),
                    ))
                }
            };
        }

        let schmitt = ctx.flag(&name, "SCHMITT_TRIGGER")?;
        let ibuf = match ctx.param_text("IBUF_TYPE").as_deref() {
            None | Some("NORMAL") => InputMode::Normal,
            Some("LOW_VOLTAGE") => InputMode::LowVoltage,
            Some("ANALOG") => InputMode::Analog,
            Some(other) => {
                return Err(EntityError::drc(
                    &name,
                    format!("IBUF_TYPE must be NORMAL, LOW_VOLTAGE or ANALOG, got {other}"),
                ))
            }
        };
        self.input_mode = match (schmitt, ibuf) {
            (false, mode) => mode,
            (true, InputMode::Normal) => InputMode::Schmitt,
            (true, _) => {
                return Err(EntityError::drc(
                    &name,
                    "SCHMITT_TRIGGER requires IBUF_TYPE NORMAL",
                ))
            }
        };
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        save_inputs(self, bits, ctx)?;
        let base = self.site.config_base;
        let input_mode = match self.input_mode {
            InputMode::Normal => 0,
            InputMode::Schmitt => 1,
            InputMode::LowVoltage => 2,
            InputMode::Analog => 3,
        };
        let drive_type = match self.drive_type {
            DriveType::PushPull => 0,
            DriveType::NmosOpenDrain => 1,
            DriveType::PmosOpenDrain => 2,
        };
        let pull = match self.pull {
            PullResistor::None => 0,
            PullResistor::R10k => 1,
            PullResistor::R100k => 2,
            PullResistor::R1M => 3,
        };
        bits.write_field(base, 2, input_mode)?;
        bits.write_field(base + 2, 2, drive_type)?;
        bits.set(base + 4, self.double_drive)?;
        bits.write_field(base + 5, 2, pull)?;
        bits.set(base + 7, self.pull_direction == PullDirection::Up)?;
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        load_inputs(self, bits, ctx)?;
        let base = self.site.config_base;
        self.input_mode = match bits.read_field(base, 2)? {
            0 => InputMode::Normal,
            1 => InputMode::Schmitt,
            2 => InputMode::LowVoltage,
            _ => InputMode::Analog,
        };
        self.drive_type = match bits.read_field(base + 2, 2)? {
            0 => DriveType::PushPull,
            1 => DriveType::NmosOpenDrain,
            2 => DriveType::PmosOpenDrain,
            _ => {
                return Err(EntityError::encoding(
                    self.description(),
                    "drive type 3 is reserved",
                ))
            }
        };
        self.double_drive = bits.get(base + 4)?;
        self.pull = match bits.read_field(base + 5, 2)? {
            0 => PullResistor::None,
            1 => PullResistor::R10k,
            2 => PullResistor::R100k,
            _ => PullResistor::R1M,
        };
        self.pull_direction = if bits.get(base + 7)? {
            PullDirection::Up
        } else {
            PullDirection::Down
        };
        Ok(())
    }
}
