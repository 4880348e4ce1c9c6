//! EXIF GPS extraction.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use docdb_shared::Coordinates;
use exif::{Exif, In, Rational, Tag, Value};
use tracing::debug;

use crate::Result;

/// Read the GPS location embedded in an image file.
///
/// # Returns
///
/// * `Ok(Some(coordinates))` - The file carries a non-zero GPS location
/// * `Ok(None)` - No EXIF data, no GPS tags, malformed GPS values, or the zero location
/// * `Err(GeolocationError::Io)` - The file could not be opened or read
pub fn extract_coordinates(path: impl AsRef<Path>) -> Result<Option<Coordinates>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        // A truncated container is missing metadata, not a failing disk.
        Err(exif::Error::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => {
            debug!(path = %path.display(), "Image ended before EXIF data");
            return Ok(None);
        }
        Err(exif::Error::Io(e)) => return Err(e.into()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No readable EXIF data");
            return Ok(None);
        }
    };

    Ok(coordinates_from_exif(&exif))
}

/// Pull latitude/longitude out of parsed EXIF fields.
///
/// Hemisphere reference tags are honoured (`S` and `W` give negative values).
/// The zero location is treated as absent.
pub fn coordinates_from_exif(exif: &Exif) -> Option<Coordinates> {
    let latitude = read_degrees(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S')?;
    let longitude = read_degrees(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W')?;

    let coordinates = Coordinates::new(latitude, longitude);
    if coordinates.is_zero() {
        return None;
    }
    Some(coordinates)
}

fn read_degrees(exif: &Exif, tag: Tag, ref_tag: Tag, negative_ref: u8) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let degrees = match &field.value {
        Value::Rational(parts) => dms_to_degrees(parts)?,
        _ => return None,
    };

    let negative = exif
        .get_field(ref_tag, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Ascii(strings) => strings.first().and_then(|s| s.first()).copied(),
            _ => None,
        })
        .is_some_and(|r| r.to_ascii_uppercase() == negative_ref);

    Some(if negative { -degrees } else { degrees })
}

/// Convert degrees/minutes/seconds rationals into decimal degrees.
///
/// Missing minutes or seconds count as zero. Returns `None` for an empty slice
/// or a zero denominator.
pub fn dms_to_degrees(parts: &[Rational]) -> Option<f64> {
    if parts.is_empty() {
        return None;
    }

    let mut degrees = 0.0;
    for (part, scale) in parts.iter().take(3).zip([1.0, 60.0, 3600.0]) {
        if part.denom == 0 {
            return None;
        }
        degrees += part.to_f64() / scale;
    }
    Some(degrees)
}
