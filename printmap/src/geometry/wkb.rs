//! Well-Known Binary reader and writer.
//!
//! Reads ISO WKB and PostGIS EWKB. SRID headers are skipped and Z/M
//! ordinates are read and dropped, leaving 2D `geo_types` geometries.

use bytes::{Buf, BufMut};
use geo_types::{Coord, LineString, MultiPolygon, Point, Polygon};

use super::GeometryError;

const WKB_POINT: u32 = 1;
const WKB_POLYGON: u32 = 3;
const WKB_MULTI_POLYGON: u32 = 6;

const EWKB_Z_FLAG: u32 = 0x8000_0000;
const EWKB_M_FLAG: u32 = 0x4000_0000;
const EWKB_SRID_FLAG: u32 = 0x2000_0000;
const EWKB_FLAGS: u32 = EWKB_Z_FLAG | EWKB_M_FLAG | EWKB_SRID_FLAG;

const BIG_ENDIAN: u8 = 0;
const LITTLE_ENDIAN: u8 = 1;

/// Parsed geometry header.
#[derive(Debug, Clone, Copy)]
struct Header {
    little_endian: bool,
    kind: u32,
    dims: usize,
}

struct WkbReader<'a> {
    buf: &'a [u8],
}

impl<'a> WkbReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn need(&self, needed: usize) -> Result<(), GeometryError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(GeometryError::Truncated { needed, remaining });
        }
        Ok(())
    }

    fn u8(&mut self) -> Result<u8, GeometryError> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    fn u32(&mut self, little_endian: bool) -> Result<u32, GeometryError> {
        self.need(4)?;
        Ok(if little_endian {
            self.buf.get_u32_le()
        } else {
            self.buf.get_u32()
        })
    }

    fn f64(&mut self, little_endian: bool) -> f64 {
        if little_endian {
            self.buf.get_f64_le()
        } else {
            self.buf.get_f64()
        }
    }

    fn header(&mut self) -> Result<Header, GeometryError> {
        let little_endian = match self.u8()? {
            LITTLE_ENDIAN => true,
            BIG_ENDIAN => false,
            other => return Err(GeometryError::InvalidByteOrder(other)),
        };

        let raw = self.u32(little_endian)?;
        if raw & EWKB_SRID_FLAG != 0 {
            self.u32(little_endian)?;
        }

        // ISO codes encode Z/M as thousands: 1003 = Polygon Z, 3006 = MultiPolygon ZM
        let iso = raw & !EWKB_FLAGS;
        let (has_z, has_m) = match iso / 1000 {
            1 => (true, false),
            2 => (false, true),
            3 => (true, true),
            _ => (false, false),
        };
        let has_z = has_z || raw & EWKB_Z_FLAG != 0;
        let has_m = has_m || raw & EWKB_M_FLAG != 0;

        Ok(Header {
            little_endian,
            kind: iso % 1000,
            dims: 2 + has_z as usize + has_m as usize,
        })
    }

    fn expect(&mut self, kind: u32, name: &'static str) -> Result<Header, GeometryError> {
        let header = self.header()?;
        if header.kind != kind {
            return Err(GeometryError::UnexpectedType {
                expected: name,
                found: header.kind,
            });
        }
        Ok(header)
    }

    fn coord(&mut self, header: &Header) -> Result<Coord<f64>, GeometryError> {
        self.need(header.dims * 8)?;
        let x = self.f64(header.little_endian);
        let y = self.f64(header.little_endian);
        for _ in 2..header.dims {
            self.f64(header.little_endian);
        }
        Ok(Coord { x, y })
    }

    fn ring(&mut self, header: &Header) -> Result<LineString<f64>, GeometryError> {
        let count = self.u32(header.little_endian)? as usize;
        // Reject counts larger than the remaining input before allocating
        self.need(count.saturating_mul(header.dims * 8))?;

        let mut coords = Vec::with_capacity(count);
        for _ in 0..count {
            coords.push(self.coord(header)?);
        }
        Ok(LineString::new(coords))
    }

    fn polygon_body(&mut self, header: &Header) -> Result<Polygon<f64>, GeometryError> {
        let ring_count = self.u32(header.little_endian)? as usize;
        if ring_count == 0 {
            return Err(GeometryError::Empty);
        }

        let exterior = self.ring(header)?;
        let mut interiors = Vec::with_capacity(ring_count.min(self.buf.remaining() / 4));
        for _ in 1..ring_count {
            interiors.push(self.ring(header)?);
        }
        Ok(Polygon::new(exterior, interiors))
    }

    fn multi_polygon_body(&mut self, header: &Header) -> Result<MultiPolygon<f64>, GeometryError> {
        let count = self.u32(header.little_endian)? as usize;
        if count == 0 {
            return Err(GeometryError::Empty);
        }

        let mut polygons = Vec::with_capacity(count.min(self.buf.remaining() / 9));
        for _ in 0..count {
            let member = self.expect(WKB_POLYGON, "Polygon")?;
            polygons.push(self.polygon_body(&member)?);
        }
        Ok(MultiPolygon::new(polygons))
    }

    fn finish(&self) -> Result<(), GeometryError> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(GeometryError::TrailingBytes(n)),
        }
    }
}

/// Decodes a territory boundary.
///
/// Accepts `Polygon` and `MultiPolygon`; a polygon is returned as a
/// one-element multipolygon. In every polygon the first ring is the exterior
/// and the rest are holes.
pub fn read_boundary(wkb: &[u8]) -> Result<MultiPolygon<f64>, GeometryError> {
    let mut reader = WkbReader::new(wkb);
    let header = reader.header()?;

    let boundary = match header.kind {
        WKB_POLYGON => MultiPolygon::new(vec![reader.polygon_body(&header)?]),
        WKB_MULTI_POLYGON => reader.multi_polygon_body(&header)?,
        found => {
            return Err(GeometryError::UnexpectedType {
                expected: "Polygon or MultiPolygon",
                found,
            })
        }
    };

    reader.finish()?;
    Ok(boundary)
}

/// Decodes a label anchor point.
pub fn read_point(wkb: &[u8]) -> Result<Point<f64>, GeometryError> {
    let mut reader = WkbReader::new(wkb);
    let header = reader.expect(WKB_POINT, "Point")?;
    let coord = reader.coord(&header)?;
    reader.finish()?;

    // Empty points are encoded as NaN ordinates
    if coord.x.is_nan() || coord.y.is_nan() {
        return Err(GeometryError::Empty);
    }
    Ok(Point::from(coord))
}

fn put_header(out: &mut Vec<u8>, kind: u32) {
    out.put_u8(LITTLE_ENDIAN);
    out.put_u32_le(kind);
}

fn put_ring(out: &mut Vec<u8>, ring: &LineString<f64>) {
    out.put_u32_le(ring.0.len() as u32);
    for coord in &ring.0 {
        out.put_f64_le(coord.x);
        out.put_f64_le(coord.y);
    }
}

/// Encodes a multipolygon as 2D little-endian WKB.
pub fn write_multi_polygon(geometry: &MultiPolygon<f64>) -> Vec<u8> {
    let mut out = Vec::new();
    put_header(&mut out, WKB_MULTI_POLYGON);
    out.put_u32_le(geometry.0.len() as u32);

    for polygon in &geometry.0 {
        put_header(&mut out, WKB_POLYGON);
        out.put_u32_le(1 + polygon.interiors().len() as u32);
        put_ring(&mut out, polygon.exterior());
        for hole in polygon.interiors() {
            put_ring(&mut out, hole);
        }
    }
    out
}

/// Encodes a point as 2D little-endian WKB.
pub fn write_point(point: &Point<f64>) -> Vec<u8> {
    let mut out = Vec::with_capacity(21);
    put_header(&mut out, WKB_POINT);
    out.put_f64_le(point.x());
    out.put_f64_le(point.y());
    out
}
