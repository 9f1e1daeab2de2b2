// decode.rs
// Typed decoding of single table cells. Every decoder takes the trimmed cell text
// and either produces a value or a `ScrapeError::Decode` naming the field.

use crate::error::{Result, ScrapeError};

/// Placeholder the site renders for "not applicable".
pub const SENTINEL: &str = "-";

fn decode_error(field: &'static str, text: &str) -> ScrapeError {
    ScrapeError::Decode {
        field,
        text: text.to_string(),
    }
}

/// Parses an integer, mapping the `-` sentinel to `-1`.
pub fn int_or_sentinel(field: &'static str, text: &str) -> Result<i32> {
    if text == SENTINEL {
        return Ok(-1);
    }
    plain_int(field, text)
}

pub fn plain_int(field: &'static str, text: &str) -> Result<i32> {
    text.trim().parse().map_err(|_| decode_error(field, text))
}

/// Base stat cells read `"<value>(<extra text>)"`; only the leading integer is kept.
pub fn stat_value(field: &'static str, text: &str) -> Result<i32> {
    let leading = text.trim_start().split('(').next().unwrap_or_default();
    plain_int(field, leading)
}

/// A boolean column with a closed two-literal vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct Flag {
    pub field: &'static str,
    pub truthy: &'static str,
    pub falsy: &'static str,
}

impl Flag {
    pub fn decode(&self, text: &str) -> Result<bool> {
        if text == self.truthy {
            Ok(true)
        } else if text == self.falsy {
            Ok(false)
        } else {
            Err(decode_error(self.field, text))
        }
    }
}

pub const IS_DIRECT: Flag = Flag {
    field: "is_direct",
    truthy: "○",
    falsy: "×",
};

pub const CAN_PROTECT: Flag = Flag {
    field: "can_protect",
    truthy: "通常",
    falsy: "不可",
};

pub const MAGIC_COAT: Flag = Flag {
    field: "magic_coat",
    truthy: "○",
    falsy: "×",
};

pub const SNATCH: Flag = Flag {
    field: "snatch",
    truthy: "○",
    falsy: "×",
};

pub const MIRROR_MOVE: Flag = Flag {
    field: "mirror_move",
    truthy: "できる",
    falsy: "できない",
};

/// How a move interacts with a substitute. The site distinguishes three cases
/// even though the exported record only keeps whether the move passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitute {
    PassesThrough,
    Blocked,
    NotApplicable,
}

impl Substitute {
    pub fn decode(text: &str) -> Result<Self> {
        match text {
            "貫通" => Ok(Substitute::PassesThrough),
            "不可" => Ok(Substitute::Blocked),
            SENTINEL => Ok(Substitute::NotApplicable),
            other => Err(decode_error("substitute", other)),
        }
    }

    pub fn passes_through(self) -> bool {
        self == Substitute::PassesThrough
    }
}
