//! Transit line records
//!
//! The dimension entity: one record per line, keyed by the unique line
//! code. Body layout: `code:i32` `card:u8` `(len,bytes)` name
//! `(len,bytes)` color. Fixed body part is 13 bytes.

use std::io::{Read, Write};

use crate::codec;
use crate::error::{Result, TransitError};
use crate::store::Record;
use crate::text::Field;

use super::{labeled, Entity, NULL_FIELD};

/// Fixed part of the record body: code (4) + card (1) + two length fields
const FIXED_BODY_LEN: i32 = 13;

/// A transit line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    live: bool,

    /// Unique line code; the sort, index, and join key
    pub code: i32,

    /// Card-payment policy byte: `S`, `N`, `F`, or 0 when null
    pub card: u8,

    /// Line name (variable length)
    pub name: String,

    /// Line color (variable length)
    pub color: String,
}

impl Line {
    pub fn new(live: bool, code: i32, card: u8, name: String, color: String) -> Self {
        Self {
            live,
            code,
            card,
            name,
            color,
        }
    }

    /// Human-readable card-payment policy.
    pub fn card_description(&self) -> &'static str {
        match self.card {
            b'S' => "card only, no onboard fare collector",
            b'N' => "card and cash",
            b'F' => "card only on weekends",
            _ => NULL_FIELD,
        }
    }
}

impl Record for Line {
    const LABEL_WIDTHS: &'static [usize] = &[15, 13, 13, 24];
    const NAME: &'static str = "line";

    fn key(&self) -> i32 {
        self.code
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn body_len(&self) -> i32 {
        FIXED_BODY_LEN + self.name.len() as i32 + self.color.len() as i32
    }

    fn write_body<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_i32(w, self.code)?;
        codec::write_u8(w, self.card)?;
        codec::write_var_text(w, &self.name)?;
        codec::write_var_text(w, &self.color)?;
        Ok(())
    }

    fn read_body<R: Read>(r: &mut R, live: bool) -> Result<Self> {
        let code = codec::read_i32(r)?.ok_or(TransitError::Truncated("line code"))?;
        let card = codec::read_u8(r)?.ok_or(TransitError::Truncated("line card byte"))?;
        let name =
            codec::read_var_text(r, "line name")?.ok_or(TransitError::Truncated("line name"))?;
        let color =
            codec::read_var_text(r, "line color")?.ok_or(TransitError::Truncated("line color"))?;

        Ok(Self {
            live,
            code,
            card,
            name,
            color,
        })
    }
}

impl Entity for Line {
    const UNIQUE_FIELD: Option<&'static str> = Some("code");

    fn from_fields(live: bool, fields: &[Field]) -> Result<Self> {
        let [code, card, name, color] = fields else {
            return Err(TransitError::Parse(format!(
                "line record needs 4 fields, got {}",
                fields.len()
            )));
        };

        if code.is_null() {
            return Err(TransitError::Parse("line code must not be null".into()));
        }

        Ok(Self {
            live,
            code: code.int()?,
            card: card.text().bytes().next().unwrap_or(0),
            name: name.text(),
            color: color.text(),
        })
    }

    fn render(&self, labels: &[String]) -> String {
        let mut out = String::new();
        labeled(&mut out, labels, 0, "code", &self.code.to_string());
        labeled(&mut out, labels, 2, "name", &self.name);
        labeled(&mut out, labels, 3, "color", &self.color);
        labeled(&mut out, labels, 1, "card", self.card_description());
        out
    }

    fn matches(&self, field: &str, value: &str) -> Result<bool> {
        match field {
            "code" => Ok(value.parse::<i32>().map_or(false, |v| v == self.code)),
            "card" => Ok(self.card != 0 && value.as_bytes() == &[self.card][..]),
            "name" => Ok(!self.name.is_empty() && self.name == value),
            "color" => Ok(!self.color.is_empty() && self.color == value),
            other => Err(TransitError::UnknownField(other.to_string())),
        }
    }
}
