mod tests {
    use myrtio_face_animator::color::{Color, Rgb, quantize, rgb_from_u32};
    use myrtio_face_animator::command::parse_hex_color;

    const PURPLE: Rgb = Rgb {
        r: 0x99,
        g: 0,
        b: 0xAA,
    };

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    #[allow(overflowing_literals)]
    fn test_rgb_from_u32() {
        assert_eq!(rgb_from_u32(0x99_00AA), PURPLE);
        assert_eq!(rgb_from_u32(0xFF_FFFF_FFFF), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_color_from_u32_is_opaque() {
        let color = Color::from_u32(0x99_00AA);
        assert_eq!(color, Color::new(153.0, 0.0, 170.0, 1.0));
        assert_eq!(color.to_rgb(), PURPLE);
    }

    #[test]
    fn test_color_from_argb() {
        let color = Color::from_argb(0x80FF_0000);
        assert_close(color.r, 255.0);
        assert_close(color.alpha, 128.0 / 255.0);
        assert_eq!(Color::from_argb(0x00FF_FFFF).to_rgb(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_to_rgb_applies_alpha() {
        let color = Color::new(255.0, 100.0, 0.0, 0.5);
        assert_eq!(color.to_rgb(), Rgb::new(128, 50, 0));
        assert_eq!(Color::TRANSPARENT.to_rgb(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_brightness_mod() {
        let color = Color::new(200.0, 100.0, 50.0, 0.8);
        let dimmed = color.brightness_mod(0.5);
        assert_eq!(dimmed, Color::new(100.0, 50.0, 25.0, 0.8));

        assert_eq!(color.brightness_mod(2.0), color);
        assert_eq!(color.brightness_mod(-1.0).to_rgb(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_merge_transition() {
        let mut color = Color::new(0.0, 0.0, 0.0, 0.0);
        color.merge_transition(Color::new(200.0, 100.0, 0.0, 1.0), 0.25);
        assert_eq!(color, Color::new(50.0, 25.0, 0.0, 0.25));

        color.merge_transition(Color::new(200.0, 100.0, 0.0, 1.0), 5.0);
        assert_eq!(color, Color::new(200.0, 100.0, 0.0, 1.0));
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(-3.0), 0);
        assert_eq!(quantize(127.4), 127);
        assert_eq!(quantize(127.5), 128);
        assert_eq!(quantize(300.0), 255);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("FF00FF"), Some(Color::from_u32(0xFF_00FF)));
        assert_eq!(parse_hex_color("0x00ff00"), Some(Color::from_u32(0x00_FF00)));
        assert_eq!(parse_hex_color("#0000FF"), Some(Color::from_u32(0x00_00FF)));
        assert_eq!(parse_hex_color("80FF0000"), Some(Color::from_argb(0x80FF_0000)));
        assert_eq!(parse_hex_color("XYZ"), None);
        assert_eq!(parse_hex_color("123456789"), None);
    }

    #[test]
    fn test_parse_hex_color_rejects_signs() {
        assert_eq!(parse_hex_color("+FFFFFF"), None);
        assert_eq!(parse_hex_color("-1"), None);
        assert_eq!(parse_hex_color("#+FF"), None);
        assert_eq!(parse_hex_color("0x"), None);
        assert_eq!(parse_hex_color(""), None);
    }
}
