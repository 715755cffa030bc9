mod tests {
    use myrtio_face_animator::color::{Color, Rgb};
    use myrtio_face_animator::element::{Element, Frame};
    use myrtio_face_animator::eyes::{
        BlendWeights, Emotion, Eyes, EyesConfig, apply_blink, blend_shape, blink_factor,
        clip_iris, rasterize_column,
    };
    use myrtio_face_animator::surface::{FrameBuffer, MatrixSurface};
    use myrtio_face_animator::templates::{EyeShape, RELAXED_EYE};

    const WHITE: Color = Color::new(255.0, 255.0, 255.0, 1.0);
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Surface that records every painted pixel
    #[derive(Default)]
    struct Recorder {
        pixels: Vec<(i32, i32, Color)>,
    }

    impl MatrixSurface for Recorder {
        fn width(&self) -> i32 {
            32
        }

        fn height(&self) -> i32 {
            16
        }

        fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
            self.pixels.push((x, y, color));
        }
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    fn uniform_shape(top: f32, bottom: f32) -> EyeShape {
        core::array::from_fn(|i| if i % 2 == 0 { top } else { bottom })
    }

    #[test]
    fn test_blend_weights_fill_with_relaxed() {
        let weights = BlendWeights::new(&[0.5, 0.2, 0.0, 0.0, 0.0]);
        assert_close(weights.relaxed, 0.3);
        assert_close(weights.emotions[0], 0.5);
        assert_close(weights.emotions[1], 0.2);
        assert_close(weights.total(), 1.0);
    }

    #[test]
    fn test_blend_weights_normalize_overflow() {
        let weights = BlendWeights::new(&[1.0, 1.0, 0.0, 0.0, 2.0]);
        assert_close(weights.relaxed, 0.0);
        assert_close(weights.emotions[0], 0.25);
        assert_close(weights.emotions[4], 0.5);
        assert_close(weights.total(), 1.0);
    }

    #[test]
    fn test_blend_shape_relaxed_only() {
        let eyes = Eyes::default();
        let shape = blend_shape(eyes.emotions());
        // Baseline plus the full relaxed template
        assert_close(shape[0], 0.01 + RELAXED_EYE[0]);
        assert_close(shape[1], -0.01 + RELAXED_EYE[1]);
        assert_close(shape[10], 0.1 + RELAXED_EYE[10]);
        assert_close(shape[11], -0.1 + RELAXED_EYE[11]);
    }

    #[test]
    fn test_blend_shape_skips_faint_emotions() {
        let relaxed = blend_shape(Eyes::default().emotions());
        let faint = Eyes::default().with_expression(Emotion::Angry, 0.05);
        let faint_shape = blend_shape(faint.emotions());
        // Only the relaxed weight shrinks, the angry template stays out
        for (faint, relaxed) in faint_shape.iter().zip(relaxed) {
            assert!(faint.abs() <= relaxed.abs() + 1e-3);
        }
    }

    #[test]
    fn test_blink_factor() {
        assert_close(blink_factor(5.0), 1.3);
        assert_close(blink_factor(15.0), 1.3);
        assert_close(blink_factor(0.0), 1.3 - 5.0 * 15.0);
        assert_close(blink_factor(10.0), 1.3 - 5.0 * 15.0);
        assert!(blink_factor(4.9) < 0.0);
    }

    #[test]
    fn test_apply_blink_uses_updated_top() {
        let mut shape = uniform_shape(1.0, 4.0);
        apply_blink(&mut shape, 5.0);

        let close = 1.3;
        let top = 1.0 * (1.0 - 0.7 * close) + 4.0 * (0.7 * close);
        let bottom = top * (0.3 * close) + 4.0 * (1.0 - 0.7 * close);
        assert_close(shape[0], top);
        assert_close(shape[1], bottom);
        assert_close(shape[20], top);
        assert_close(shape[21], bottom);
    }

    #[test]
    fn test_apply_blink_open_eye_untouched() {
        let mut shape = uniform_shape(1.0, 4.0);
        apply_blink(&mut shape, 0.0);
        assert_eq!(shape, uniform_shape(1.0, 4.0));
    }

    #[test]
    fn test_clip_iris() {
        let mut shape = uniform_shape(1.0, 4.0);
        clip_iris(&mut shape, 3.0);
        assert_close(shape[6], 3.9);
        assert_close(shape[7], 4.0);
        assert_close(shape[4], 1.0);

        // Rounds to the nearest column
        let mut shape = uniform_shape(1.0, 4.0);
        clip_iris(&mut shape, 4.6);
        assert_close(shape[10], 3.9);
    }

    #[test]
    fn test_clip_iris_out_of_range() {
        for position in [-1.0, 10.6, 42.0] {
            let mut shape = uniform_shape(1.0, 4.0);
            clip_iris(&mut shape, position);
            assert_eq!(shape, uniform_shape(1.0, 4.0));
        }
    }

    #[test]
    fn test_rasterize_column_fractional_rows() {
        let mut surface = Recorder::default();
        rasterize_column(&mut surface, 4, 0, 2.3, 5.7, WHITE);

        let rows: Vec<i32> = surface.pixels.iter().map(|(_, y, _)| *y).collect();
        assert_eq!(rows, vec![2, 3, 4, 5]);
        assert!(surface.pixels.iter().all(|(x, _, _)| *x == 4));

        let coverage: Vec<f32> = surface.pixels.iter().map(|(_, _, c)| c.r / 255.0).collect();
        assert_close(coverage[0], 0.7);
        assert_close(coverage[1], 1.0);
        assert_close(coverage[2], 1.0);
        assert_close(coverage[3], 0.7);
    }

    #[test]
    fn test_rasterize_column_single_row() {
        let mut surface = Recorder::default();
        rasterize_column(&mut surface, 0, 3, 2.2, 2.6, WHITE);
        assert_eq!(surface.pixels.len(), 1);
        let (x, y, color) = surface.pixels[0];
        assert_eq!((x, y), (0, 5));
        assert_close(color.r / 255.0, 0.4);
    }

    #[test]
    fn test_rasterize_column_skips_empty() {
        let mut surface = Recorder::default();
        rasterize_column(&mut surface, 0, 0, 3.0, 3.0, WHITE);
        rasterize_column(&mut surface, 0, 0, 4.0, 1.0, WHITE);
        // Bottom exactly on a row boundary leaves that row alone
        rasterize_column(&mut surface, 1, 0, 1.0, 3.0, WHITE);
        let rows: Vec<i32> = surface.pixels.iter().map(|(_, y, _)| *y).collect();
        assert_eq!(rows, vec![1, 2]);
    }

    #[test]
    fn test_eyes_attributes() {
        let mut eyes = Eyes::default();
        assert!(eyes.float_attr(0x000).is_some());
        for emotion in Emotion::ALL {
            assert!(eyes.float_attr(emotion.attribute()).is_some());
        }
        assert_eq!(Emotion::Shy.attribute(), 0x104);
        assert!(eyes.float_attr(0x105).is_none());
        assert!(eyes.float_attr(0x200).is_none());

        for id in 0..3 {
            assert!(eyes.color_attr(id).is_some());
        }
        assert!(eyes.color_attr(3).is_none());

        *eyes.float_attr(Emotion::Heart.attribute()).unwrap() = 0.8;
        assert_close(eyes.expressiveness(Emotion::Heart), 0.8);
    }

    #[test]
    fn test_emotion_names() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::parse_from_str(emotion.as_str()), Some(emotion));
        }
        assert_eq!(Emotion::parse_from_str("sleepy"), None);
        assert_eq!(Emotion::from_attribute(0x0FF), None);
        assert_eq!(Emotion::from_attribute(0x102), Some(Emotion::Heart));
    }

    #[test]
    fn test_eyes_render() {
        let config = EyesConfig {
            origin_x: 0,
            origin_y: 0,
            blush_color: Color::TRANSPARENT,
            ..EyesConfig::default()
        };
        let mut eyes = Eyes::new(&config);
        let mut frame = FrameBuffer::<32, 16>::new();
        eyes.advance(&Frame::default(), &mut frame);

        // Relaxed column 5 spans rows 1.6..6.8
        assert_eq!(frame.pixel(5, 3), Some(config.outer_color.to_rgb()));
        assert_eq!(frame.pixel(5, 0), Some(BLACK));
        // The iris column is cut down to its lowest rows
        assert_eq!(frame.pixel(3, 3), Some(BLACK));
        assert_ne!(frame.pixel(3, 6), Some(BLACK));
        // Nothing outside the eye columns
        assert!((11..32).all(|x| (0..16).all(|y| frame.pixel(x, y) == Some(BLACK))));
    }

    #[test]
    fn test_eyes_blush() {
        let mut eyes = Eyes::default();
        let mut frame = FrameBuffer::<32, 16>::new();
        eyes.advance(&Frame::default(), &mut frame);
        let blush = EyesConfig::default().blush_color.to_rgb();
        assert_eq!(frame.pixel(17, 9), Some(blush));
        assert_eq!(frame.pixel(20, 9), Some(blush));
        assert_eq!(frame.pixel(16, 10), Some(blush));

        let mut eyes = Eyes::default();
        *eyes.color_attr(2).unwrap() = Color::TRANSPARENT;
        let mut frame = FrameBuffer::<32, 16>::new();
        eyes.advance(&Frame::default(), &mut frame);
        assert_eq!(frame.pixel(17, 9), Some(BLACK));
    }
}
