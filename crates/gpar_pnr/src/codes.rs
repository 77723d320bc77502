//! Diagnostic codes for place-and-route failures.
//!
//! `E1xx` codes are structural netlist problems, `E2xx` binding failures,
//! `E3xx` design-rule violations and `E4xx` features not implemented for the
//! selected part.

use gpar_diagnostics::{Category, DiagnosticCode};

/// The netlist could not be loaded.
pub const E101: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 101,
};

/// A cell connects a port its primitive does not have.
pub const E102: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 102,
};

/// A net has more than one driver.
pub const E103: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 103,
};

/// A net has loads but no driver.
pub const E104: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 104,
};

/// A bidirectional top-level port has no `GP_IOBUF`.
pub const E105: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 105,
};

/// No entity on the part accepts the cell type.
pub const E201: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 201,
};

/// A `LOC` constraint names no matching entity.
pub const E202: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 202,
};

/// Two cells request the same entity.
pub const E203: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 203,
};

/// Every entity of the required family is taken.
pub const E204: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 204,
};

/// A pin constraint names no I/O pin of the part.
pub const E205: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 205,
};

/// Two pads request the same pin.
pub const E206: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 206,
};

/// The cross-connection pool between two matrices is used up.
pub const E207: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 207,
};

/// A parameter or connection violates a hardware rule.
pub const E301: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 301,
};

/// Entity state has no bit encoding.
pub const E302: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};

/// An analog output is wired to a routing-matrix input.
pub const E303: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// The primitive is not implemented for the selected part.
pub const E401: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 401,
};

/// Informational summary emitted after placement.
pub const I601: DiagnosticCode = DiagnosticCode {
    category: Category::Info,
    number: 601,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_with_prefix() {
        assert_eq!(E101.to_string(), "E101");
        assert_eq!(E207.to_string(), "E207");
        assert_eq!(E401.to_string(), "E401");
        assert_eq!(I601.to_string(), "I601");
    }

    #[test]
    fn stage_digit_follows_pipeline_order() {
        for code in [E101, E102, E103, E104, E105] {
            assert_eq!(code.stage(), 1, "{code}");
        }
        for code in [E201, E202, E203, E204, E205, E206, E207] {
            assert_eq!(code.stage(), 2, "{code}");
        }
        for code in [E301, E302, E303] {
            assert_eq!(code.stage(), 3, "{code}");
        }
        assert_eq!(E401.stage(), 4);
    }
}
