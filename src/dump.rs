//! Parameter files.
//!
//! Two formats are supported:
//!
//! * the legacy type-A text dump understood by pairing libraries,
//!
//!   ```text
//!   type a
//!   q <field prime>
//!   h <cofactor>
//!   r <group order>
//!   exp2 <exp2>
//!   exp1 <exp1>
//!   sign1 <sign1>
//!   sign0 <sign0>
//!   ```
//!
//! * a versioned JSON document with the integers as decimal strings.
//!
//! Readers validate the recovered parameter set before returning it.

use std::fs;
use std::io::Write;
use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::params::{CurveKind, DomainParameters, Sign, SolinasForm};

/// Version of the JSON document written by [`to_json`].
pub const FORMAT_VERSION: u32 = 1;

/// Miller-Rabin rounds used when validating files.
const VALIDATION_ROUNDS: usize = 20;

fn corrupt<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::ParameterFileCorrupt(msg.into()))
}

/// Writes the legacy text dump.
pub fn write_legacy<W: Write>(params: &DomainParameters, mut w: W) -> Result<()> {
    let s = &params.solinas;

    writeln!(w, "type {}", params.curve.name())?;
    writeln!(w, "q {}", params.field_prime)?;
    writeln!(w, "h {}", params.cofactor)?;
    writeln!(w, "r {}", params.group_order)?;
    writeln!(w, "exp2 {}", s.exp2)?;
    writeln!(w, "exp1 {}", s.exp1)?;
    writeln!(w, "sign1 {}", s.sign1)?;
    writeln!(w, "sign0 {}", s.sign0)?;

    Ok(())
}

pub fn to_legacy_string(params: &DomainParameters) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_legacy(params, &mut buf);

    String::from_utf8_lossy(&buf).into_owned()
}

/// Reads the group order the way older tooling did: the fourth line of the
/// dump, from byte offset 2 on.
///
/// Any other layout is reported as corrupt rather than misread.
pub fn legacy_group_order(text: &str) -> Result<BigUint> {
    let mut lines = text.lines();

    match lines.next().map(str::split_whitespace).map(|mut t| t.next()) {
        Some(Some("type")) => {}
        _ => return corrupt("missing type header"),
    }

    let line = match lines.nth(2) {
        Some(line) => line,
        None => return corrupt("dump ends before the group order line"),
    };
    if !line.starts_with("r ") {
        return corrupt(format!("expected the group order on line 4, found {:?}", line));
    }

    parse_decimal("r", &line[2..])
}

fn parse_decimal(field: &str, text: &str) -> Result<BigUint> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return corrupt(format!("field {} is not a decimal integer: {:?}", field, text));
    }

    text.parse::<BigUint>()
        .or_else(|_| corrupt(format!("field {} is not a decimal integer", field)))
}

fn parse_small<T: core::str::FromStr>(field: &str, text: &str) -> Result<T> {
    text.trim()
        .parse::<T>()
        .or_else(|_| corrupt(format!("field {} is malformed: {:?}", field, text)))
}

fn parse_sign(field: &str, text: &str) -> Result<Sign> {
    match Sign::from_i8(parse_small(field, text)?) {
        Some(sign) => Ok(sign),
        None => corrupt(format!("field {} must be 1 or -1", field)),
    }
}

/// Parses a legacy dump by field label, in any order.
#[instrument(level = "debug", skip(text))]
pub fn from_legacy_str(text: &str) -> Result<DomainParameters> {
    let mut lookup = std::collections::HashMap::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (key, value) = match line.split_once(char::is_whitespace) {
            Some(kv) => kv,
            None => return corrupt(format!("line without value: {:?}", line)),
        };
        if lookup.insert(key, value.trim()).is_some() {
            return corrupt(format!("duplicate field {}", key));
        }
    }

    let field = |key: &str| match lookup.get(key) {
        Some(v) => Ok(*v),
        None => corrupt(format!("missing field {}", key)),
    };

    if field("type")? != CurveKind::TypeA.name() {
        return corrupt("unsupported curve type");
    }

    let group_order = parse_decimal("r", field("r")?)?;
    let params = DomainParameters {
        security_bits: (group_order.bits().saturating_sub(1)) as u32,
        field_prime: parse_decimal("q", field("q")?)?,
        cofactor: parse_decimal("h", field("h")?)?,
        solinas: SolinasForm {
            exp2: parse_small("exp2", field("exp2")?)?,
            exp1: parse_small("exp1", field("exp1")?)?,
            sign1: parse_sign("sign1", field("sign1")?)?,
            sign0: parse_sign("sign0", field("sign0")?)?,
        },
        group_order,
        curve: CurveKind::TypeA,
    };
    params.validate(VALIDATION_ROUNDS)?;
    debug!(r = %params.group_order, "parsed legacy dump");

    Ok(params)
}

/// JSON representation; integers are decimal strings.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamFile {
    version: u32,
    curve: String,
    security_bits: u32,
    group_order: String,
    field_prime: String,
    cofactor: String,
    exp2: u32,
    exp1: u32,
    sign1: i8,
    sign0: i8,
}

pub fn to_json(params: &DomainParameters) -> String {
    let file = ParamFile {
        version: FORMAT_VERSION,
        curve: params.curve.name().to_string(),
        security_bits: params.security_bits,
        group_order: params.group_order.to_string(),
        field_prime: params.field_prime.to_string(),
        cofactor: params.cofactor.to_string(),
        exp2: params.solinas.exp2,
        exp1: params.solinas.exp1,
        sign1: params.solinas.sign1.as_i8(),
        sign0: params.solinas.sign0.as_i8(),
    };

    // ParamFile has no maps with non-string keys, so serialization cannot fail
    serde_json::to_string_pretty(&file).unwrap_or_default()
}

#[instrument(level = "debug", skip(json))]
pub fn from_json(json: &str) -> Result<DomainParameters> {
    let file: ParamFile = serde_json::from_str(json)
        .or_else(|e| corrupt(format!("malformed parameter document: {}", e)))?;

    if file.version != FORMAT_VERSION {
        return corrupt(format!("unsupported format version {}", file.version));
    }
    if file.curve != CurveKind::TypeA.name() {
        return corrupt(format!("unsupported curve type {:?}", file.curve));
    }

    let params = DomainParameters {
        security_bits: file.security_bits,
        group_order: parse_decimal("group_order", &file.group_order)?,
        field_prime: parse_decimal("field_prime", &file.field_prime)?,
        cofactor: parse_decimal("cofactor", &file.cofactor)?,
        solinas: SolinasForm {
            exp2: file.exp2,
            exp1: file.exp1,
            sign1: parse_sign("sign1", &file.sign1.to_string())?,
            sign0: parse_sign("sign0", &file.sign0.to_string())?,
        },
        curve: CurveKind::TypeA,
    };
    if params.group_order.bits() != u64::from(params.security_bits) + 1 {
        return corrupt("security_bits does not match the group order");
    }
    params.validate(VALIDATION_ROUNDS)?;

    Ok(params)
}

/// Writes the JSON document to `path`.
pub fn save<P: AsRef<Path>>(params: &DomainParameters, path: P) -> Result<()> {
    fs::write(path, to_json(params))?;
    Ok(())
}

/// Reads a parameter file, JSON or legacy text.
pub fn load<P: AsRef<Path>>(path: P) -> Result<DomainParameters> {
    let text = fs::read_to_string(path)?;

    if text.trim_start().starts_with('{') {
        from_json(&text)
    } else {
        from_legacy_str(&text)
    }
}
