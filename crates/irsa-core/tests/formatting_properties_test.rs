//! Property tests for coordinate and dimension formatting

use irsa_core::models::{AngleUnit, Dimension, SkyCoord};
use irsa_core::parse::{format_decimal_coords, parse_dimension};
use proptest::prelude::*;

proptest! {
    #[test]
    fn decimal_coords_always_sign_the_declination(ra in 0.0f64..360.0, dec in -90.0f64..90.0) {
        let out = format_decimal_coords(ra, dec);
        let mut parts = out.split(' ');
        let ra_text = parts.next().unwrap();
        let dec_text = parts.next().unwrap();

        prop_assert!(parts.next().is_none());
        prop_assert!(dec_text.starts_with('+') || dec_text.starts_with('-'));
        prop_assert_eq!(ra_text.parse::<f64>().unwrap(), ra);
        prop_assert_eq!(dec_text.parse::<f64>().unwrap(), dec);
    }

    #[test]
    fn integer_coords_print_bare(ra in 0i64..360, dec in -90i64..90) {
        let out = format_decimal_coords(ra, dec);
        prop_assert!(!out.contains('.'));
    }

    #[test]
    fn parse_dimension_lands_in_a_sky_unit(value in 0.0f64..100.0, unit_index in 0usize..5) {
        let unit = [
            AngleUnit::Arcsec,
            AngleUnit::Arcmin,
            AngleUnit::Deg,
            AngleUnit::Rad,
            AngleUnit::Hour,
        ][unit_index];
        let dim = parse_dimension(Dimension::new(value, unit)).unwrap();

        prop_assert!(dim.unit.is_sky_unit());
        prop_assert!((dim.degrees() - Dimension::new(value, unit).degrees()).abs() < 1e-9);
    }

    #[test]
    fn galactic_round_trip_is_stable(l in 0.0f64..360.0, b in -89.0f64..89.0) {
        let back = SkyCoord::galactic(l, b).to_icrs().to_galactic();

        let dl = (back.lon - l).abs();
        prop_assert!(dl < 1e-8 || (360.0 - dl) < 1e-8, "l {} came back as {}", l, back.lon);
        prop_assert!((back.lat - b).abs() < 1e-8);
    }
}
