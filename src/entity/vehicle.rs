//! Vehicle records
//!
//! The detail entity: one record per vehicle, carrying the line code as
//! a foreign key. Body layout: `prefix:5` `date:10` `seats:i32`
//! `line_code:i32` `(len,bytes)` model `(len,bytes)` category. Fixed
//! body part is 31 bytes.
//!
//! The vehicle's unique identifier is its 5-byte registration prefix,
//! which is not an integer and therefore never indexed; the integer key
//! used for sorting and joining is `line_code`, which may repeat.

use std::io::{Read, Write};

use crate::codec;
use crate::error::{Result, TransitError};
use crate::store::Record;
use crate::text::Field;

use super::{labeled, Entity};

/// Fixed part of the record body:
/// prefix (5) + date (10) + seats (4) + line_code (4) + two length fields
const FIXED_BODY_LEN: i32 = 31;

const PREFIX_WIDTH: usize = 5;
const DATE_WIDTH: usize = 10;

/// A vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    live: bool,

    /// Registration prefix, at most 5 bytes, unique per vehicle
    pub prefix: String,

    /// Entry-into-service date, at most 10 bytes (`YYYY-MM-DD`)
    pub date: String,

    /// Seat count; -1 when null
    pub seats: i32,

    /// Foreign key into the line store; the sort and join key
    pub line_code: i32,

    /// Vehicle model (variable length)
    pub model: String,

    /// Vehicle category (variable length)
    pub category: String,
}

impl Vehicle {
    pub fn new(
        live: bool,
        prefix: String,
        date: String,
        seats: i32,
        line_code: i32,
        model: String,
        category: String,
    ) -> Self {
        Self {
            live,
            prefix,
            date,
            seats,
            line_code,
            model,
            category,
        }
    }
}

impl Record for Vehicle {
    const LABEL_WIDTHS: &'static [usize] = &[19, 36, 43, 27, 18, 21];
    const NAME: &'static str = "vehicle";

    fn key(&self) -> i32 {
        self.line_code
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn body_len(&self) -> i32 {
        FIXED_BODY_LEN + self.model.len() as i32 + self.category.len() as i32
    }

    fn write_body<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_fixed_text(w, &self.prefix, PREFIX_WIDTH)?;
        codec::write_fixed_text(w, &self.date, DATE_WIDTH)?;
        codec::write_i32(w, self.seats)?;
        codec::write_i32(w, self.line_code)?;
        codec::write_var_text(w, &self.model)?;
        codec::write_var_text(w, &self.category)?;
        Ok(())
    }

    fn read_body<R: Read>(r: &mut R, live: bool) -> Result<Self> {
        let prefix = codec::read_fixed_text(r, PREFIX_WIDTH, "vehicle prefix")?;
        let date = codec::read_fixed_text(r, DATE_WIDTH, "vehicle date")?;
        let seats = codec::read_i32(r)?.ok_or(TransitError::Truncated("vehicle seats"))?;
        let line_code =
            codec::read_i32(r)?.ok_or(TransitError::Truncated("vehicle line code"))?;
        let model = codec::read_var_text(r, "vehicle model")?
            .ok_or(TransitError::Truncated("vehicle model"))?;
        let category = codec::read_var_text(r, "vehicle category")?
            .ok_or(TransitError::Truncated("vehicle category"))?;

        Ok(Self {
            live,
            prefix,
            date,
            seats,
            line_code,
            model,
            category,
        })
    }
}

impl Entity for Vehicle {
    const UNIQUE_FIELD: Option<&'static str> = Some("prefix");

    fn from_fields(live: bool, fields: &[Field]) -> Result<Self> {
        let [prefix, date, seats, line_code, model, category] = fields else {
            return Err(TransitError::Parse(format!(
                "vehicle record needs 6 fields, got {}",
                fields.len()
            )));
        };

        let prefix = prefix.text();
        if prefix.len() > PREFIX_WIDTH {
            return Err(TransitError::Parse(format!(
                "vehicle prefix {:?} exceeds {} bytes",
                prefix, PREFIX_WIDTH
            )));
        }

        Ok(Self {
            live,
            prefix,
            date: date.text(),
            seats: seats.int()?,
            line_code: line_code.int()?,
            model: model.text(),
            category: category.text(),
        })
    }

    fn render(&self, labels: &[String]) -> String {
        let seats = if self.seats < 0 {
            String::new()
        } else {
            self.seats.to_string()
        };

        let mut out = String::new();
        labeled(&mut out, labels, 0, "prefix", &self.prefix);
        labeled(&mut out, labels, 4, "model", &self.model);
        labeled(&mut out, labels, 5, "category", &self.category);
        labeled(&mut out, labels, 1, "date", &self.date);
        labeled(&mut out, labels, 2, "seats", &seats);
        out
    }

    fn matches(&self, field: &str, value: &str) -> Result<bool> {
        match field {
            "prefix" => Ok(!self.prefix.is_empty() && self.prefix == value),
            "date" => Ok(!self.date.is_empty() && self.date == value),
            "seats" => Ok(self.seats >= 0 && value.parse::<i32>().map_or(false, |v| v == self.seats)),
            "line_code" => Ok(value.parse::<i32>().map_or(false, |v| v == self.line_code)),
            "model" => Ok(!self.model.is_empty() && self.model == value),
            "category" => Ok(!self.category.is_empty() && self.category == value),
            other => Err(TransitError::UnknownField(other.to_string())),
        }
    }
}
