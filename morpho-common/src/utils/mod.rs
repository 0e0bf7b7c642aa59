// private sub-module defined in other files
mod byte_order_reader;

// exports identifiers from private sub-modules in the current module namespace
pub use self::byte_order_reader::ByteOrderReader;
pub use self::byte_order_reader::Endianness;

use std::time::Instant;

/// Returns a formatted string of elapsed time, e.g.
/// `1min 34.852s`
pub fn get_formatted_elapsed_time(instant: Instant) -> String {
    let dur = instant.elapsed();
    let minutes = dur.as_secs() / 60;
    let sub_sec = dur.as_secs() % 60;
    let sub_milli = dur.subsec_millis();
    if minutes > 0 {
        return format!("{}min {}.{}s", minutes, sub_sec, sub_milli);
    }
    format!("{}.{}s", sub_sec, sub_milli)
}

// WGS84-derived constants shared by the forward and inverse conversions.
// C is the polar radius of curvature and E2 the squared second eccentricity.
const K0: f64 = 0.9996;
const C: f64 = 6399593.625;
const E2: f64 = 0.006739496742;
const ALFA: f64 = 3.0 / 4.0 * E2;

/// Converts geographic coordinates into UTM easting/northing, returning
/// the zone number and latitude band letter along with the coordinates.
/// Accurate to within a few centimetres of reference conversion libraries.
pub fn deg_to_utm(latitude: f64, longitude: f64) -> (f64, f64, isize, char) {
    let zone = (longitude / 6.0 + 31.0).floor() as isize;
    let letter = utm_band_letter(latitude);
    let (easting, northing) = deg_to_utm_zone(latitude, longitude, zone, letter);
    (easting, northing, zone, letter)
}

/// Same conversion with the zone pinned by the caller, used when a whole
/// layer must land in one zone even if it straddles a zone boundary.
pub fn deg_to_utm_zone(latitude: f64, longitude: f64, zone: isize, letter: char) -> (f64, f64) {
    let lat = latitude.to_radians();
    let dl = longitude.to_radians() - (6.0 * zone as f64 - 183.0).to_radians();
    let cos2 = lat.cos() * lat.cos();
    let eps = 0.5 * ((1.0 + lat.cos() * dl.sin()) / (1.0 - lat.cos() * dl.sin())).ln();
    let nu = (lat.tan() / dl.cos()).atan() - lat;
    let v = K0 * C / (1.0 + E2 * cos2).sqrt();
    let zeta = E2 / 2.0 * eps * eps * cos2;

    let sin2lat = (2.0 * lat).sin();
    let beta = 5.0 / 3.0 * ALFA * ALFA;
    let gamma = 35.0 / 27.0 * ALFA * ALFA * ALFA;
    let j2 = lat + sin2lat / 2.0;
    let j4 = (3.0 * j2 + sin2lat * cos2) / 4.0;
    let j6 = (5.0 * j4 + sin2lat * cos2 * cos2) / 3.0;
    let meridian_arc = K0 * C * (lat - ALFA * j2 + beta * j4 - gamma * j6);

    let easting = eps * v * (1.0 + zeta / 3.0) + 500000.0;
    let mut northing = nu * v * (1.0 + zeta) + meridian_arc;
    if letter < 'N' {
        // southern hemisphere false northing
        northing += 10000000.0;
    }

    (easting, northing)
}

/// The inverse of `deg_to_utm`. Returns (latitude, longitude) in degrees.
pub fn utm_to_deg(zone: isize, letter: char, easting: f64, northing: f64) -> (f64, f64) {
    let north = if letter < 'N' {
        northing - 10000000.0
    } else {
        northing
    };

    let lat0 = north / 6366197.724 / K0;
    let cos2 = lat0.cos() * lat0.cos();
    let v = K0 * C / (1.0 + E2 * cos2).sqrt();
    let a = (easting - 500000.0) / v;

    let sin2lat = (2.0 * lat0).sin();
    let beta = 5.0 / 3.0 * ALFA * ALFA;
    let gamma = 35.0 / 27.0 * ALFA * ALFA * ALFA;
    let j2 = lat0 + sin2lat / 2.0;
    let j4 = (3.0 * j2 + sin2lat * cos2) / 4.0;
    let j6 = (5.0 * j4 + sin2lat * cos2 * cos2) / 3.0;
    let b = (north - K0 * C * (lat0 - ALFA * j2 + beta * j4 - gamma * j6)) / v;

    let zeta = E2 * a * a / 2.0 * cos2;
    let xi = a * (1.0 - zeta / 3.0);
    let eta = b * (1.0 - zeta) + lat0;
    let dl = (xi.sinh() / eta.cos()).atan();
    let tau = (dl.cos() * eta.tan()).atan();

    let latitude = (lat0
        + (1.0 + E2 * cos2 - 3.0 / 2.0 * E2 * lat0.sin() * lat0.cos() * (tau - lat0))
            * (tau - lat0))
        .to_degrees();
    let longitude = dl.to_degrees() + zone as f64 * 6.0 - 183.0;

    (latitude, longitude)
}

fn utm_band_letter(latitude: f64) -> char {
    // 8-degree latitude bands, C..X, skipping I and O
    const BANDS: [(f64, char); 20] = [
        (-72.0, 'C'),
        (-64.0, 'D'),
        (-56.0, 'E'),
        (-48.0, 'F'),
        (-40.0, 'G'),
        (-32.0, 'H'),
        (-24.0, 'J'),
        (-16.0, 'K'),
        (-8.0, 'L'),
        (0.0, 'M'),
        (8.0, 'N'),
        (16.0, 'P'),
        (24.0, 'Q'),
        (32.0, 'R'),
        (40.0, 'S'),
        (48.0, 'T'),
        (56.0, 'U'),
        (64.0, 'V'),
        (72.0, 'W'),
        (f64::INFINITY, 'X'),
    ];
    for (upper, letter) in BANDS {
        if latitude < upper {
            return letter;
        }
    }
    'X'
}

#[cfg(test)]
mod test {
    use super::{deg_to_utm, utm_to_deg};

    #[test]
    fn test_deg_to_utm() {
        // Guelph, Ontario
        let (easting, northing, zone, letter) = deg_to_utm(43.5448, -80.2482);
        assert_eq!(zone, 17);
        assert_eq!(letter, 'T');
        // about 60 km east of the zone 17 central meridian
        assert!((easting - 560600.0).abs() < 1000.0);
        assert!((northing - 4822000.0).abs() < 3000.0);
    }

    #[test]
    fn test_southern_hemisphere_false_northing() {
        let (_, northing, _, letter) = deg_to_utm(-33.8688, 151.2093);
        assert_eq!(letter, 'H');
        assert!(northing > 6000000.0); // false northing applied
    }

    #[test]
    fn test_utm_round_trip() {
        let (lat_in, lon_in) = (19.076, 72.8777);
        let (easting, northing, zone, letter) = deg_to_utm(lat_in, lon_in);
        let (lat_out, lon_out) = utm_to_deg(zone, letter, easting, northing);
        assert!((lat_out - lat_in).abs() < 1e-4);
        assert!((lon_out - lon_in).abs() < 1e-4);
    }
}
