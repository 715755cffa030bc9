mod tests {
    use myrtio_face_animator::color::Color;
    use myrtio_face_animator::command::{
        ColorCommand, ColorLinkSpec, Command, FloatCommand, FloatLinkSpec, Topic, decode,
        decode_address,
    };
    use myrtio_face_animator::element::ElementSlot;
    use myrtio_face_animator::eyes::{Emotion, Eyes, IRIS_ATTRIBUTE};
    use myrtio_face_animator::id::{ElementId, GlobalAddress};
    use myrtio_face_animator::server::{AnimationServer, Lifetime};
    use myrtio_face_animator::surface::FrameBuffer;
    use myrtio_face_animator::text::ScrollingText;

    const FACE: ElementId = ElementId::new(1, 0);
    const MIRROR: ElementId = ElementId::new(1, 1);
    const LABEL: ElementId = ElementId::new(2, 0);

    fn address(set_id: u8, module_id: u8, attribute: u16) -> GlobalAddress {
        GlobalAddress::new(ElementId::new(set_id, module_id), attribute)
    }

    fn decode_all<'a>(topic: &str, payload: &'a str) -> Vec<Command<'a>> {
        decode(topic, payload).map(Iterator::collect).unwrap_or_default()
    }

    fn tick(server: &mut AnimationServer<4, 8>, delta_time: f32) {
        let mut frame = FrameBuffer::<32, 16>::new();
        server.tick(delta_time, &mut frame);
    }

    #[test]
    fn test_decode_address() {
        assert_eq!(decode_address("S1M0V100"), Some(address(1, 0, 0x100)));
        assert_eq!(decode_address("S12M3"), Some(address(12, 3, 0)));
        assert_eq!(decode_address("S0M0VfF"), Some(address(0, 0, 0xFF)));
        assert_eq!(decode_address("X1M0"), None);
        assert_eq!(decode_address("S1"), None);
        assert_eq!(decode_address("S1M0V"), None);
        assert_eq!(decode_address("S1M0VZZ"), None);
        assert_eq!(decode_address("S300M0"), None);
    }

    #[test]
    fn test_element_id_uniq() {
        let id = ElementId::new(3, 1);
        assert_eq!(id.uniq(), 0x0103);
        assert_eq!(ElementId::from_uniq(0x0103), id);
    }

    #[test]
    fn test_topics() {
        for topic in ["SET", "CSET", "SSET", "DELETE", "DTIME"] {
            let parsed = Topic::parse_from_str(topic);
            assert_eq!(parsed.map(Topic::as_str), Some(topic));
            assert_eq!(decode(topic, "").map(|commands| commands.topic()), parsed);
        }
        assert!(decode("BLINK", "S1M0").is_none());
    }

    #[test]
    fn test_parse_float_spec() {
        assert_eq!(FloatCommand::parse("0.5"), Some(FloatCommand::Set(0.5)));
        assert_eq!(FloatCommand::parse("J3"), Some(FloatCommand::Jump(3.0)));
        assert_eq!(FloatCommand::parse(""), None);
        assert_eq!(FloatCommand::parse("fast"), None);
        assert_eq!(
            FloatCommand::parse("J3 V0 S1M0V0 0 1 0.3 0"),
            Some(FloatCommand::Link(FloatLinkSpec {
                jump: Some(3.0),
                speed: Some(0.0),
                source: Some(address(1, 0, 0)),
                add_offset: 0.0,
                mult_offset: 1.0,
                distance: 0.3,
                time: 0.0,
            }))
        );
        assert_eq!(
            FloatCommand::parse("0.5 2"),
            Some(FloatCommand::Link(FloatLinkSpec {
                jump: None,
                speed: None,
                source: None,
                add_offset: 0.5,
                mult_offset: 2.0,
                distance: 0.0,
                time: 0.0,
            }))
        );
    }

    #[test]
    fn test_parse_color_spec() {
        let red = Color::from_u32(0xFF_0000);
        let green = Color::from_u32(0x00_FF00);
        assert_eq!(ColorCommand::parse("FF0000"), Some(ColorCommand::Set(red)));
        assert_eq!(ColorCommand::parse("JFF0000"), Some(ColorCommand::Jump(red)));
        assert_eq!(ColorCommand::parse("nothex"), None);
        assert_eq!(
            ColorCommand::parse("JFF0000 00FF00 2"),
            Some(ColorCommand::Link(ColorLinkSpec {
                jump: Some(red),
                intermediate: None,
                target: green,
                f1: 2.0,
                f2: 0.0,
            }))
        );
        assert_eq!(
            ColorCommand::parse("V000000 00FF00 2 4"),
            Some(ColorCommand::Link(ColorLinkSpec {
                jump: None,
                intermediate: Some(Color::BLACK),
                target: green,
                f1: 2.0,
                f2: 4.0,
            }))
        );
    }

    #[test]
    fn test_decode_set_follows_previous_attribute() {
        let commands = decode_all("SET", "S1M0V100 0.5;0.2; 0.1 ;S1M1V1 J3");
        assert_eq!(
            commands,
            [
                Command::SetFloat(address(1, 0, 0x100), FloatCommand::Set(0.5)),
                Command::SetFloat(address(1, 0, 0x101), FloatCommand::Set(0.2)),
                Command::SetFloat(address(1, 0, 0x102), FloatCommand::Set(0.1)),
                Command::SetFloat(address(1, 1, 1), FloatCommand::Jump(3.0)),
            ]
        );
    }

    #[test]
    fn test_decode_skips_malformed_entries() {
        let commands = decode_all("SET", "S1M0V100 abc;;S1M0V101 1;S1MxV0 2");
        assert_eq!(
            commands,
            [Command::SetFloat(address(1, 0, 0x101), FloatCommand::Set(1.0))]
        );

        // Nothing to follow without a leading address
        assert!(decode_all("SET", "0.5").is_empty());
    }

    #[test]
    fn test_decode_color_set() {
        let commands = decode_all("CSET", "S1M0V0 FF00FF;N JFF0000 00FF00 2");
        assert_eq!(
            commands,
            [
                Command::SetColor(
                    address(1, 0, 0),
                    ColorCommand::Set(Color::from_u32(0xFF_00FF))
                ),
                Command::SetColor(
                    address(1, 0, 1),
                    ColorCommand::Link(ColorLinkSpec {
                        jump: Some(Color::from_u32(0xFF_0000)),
                        intermediate: None,
                        target: Color::from_u32(0x00_FF00),
                        f1: 2.0,
                        f2: 0.0,
                    })
                ),
            ]
        );
    }

    #[test]
    fn test_decode_text_keeps_separators() {
        assert_eq!(
            decode_all("SSET", "S2M0 Hello; there"),
            [Command::SetText(LABEL, "Hello; there")]
        );
        assert_eq!(decode_all("SSET", "S2M0"), [Command::SetText(LABEL, "")]);
    }

    #[test]
    fn test_decode_delete() {
        assert_eq!(
            decode_all("DELETE", "S1M0;SET 2;SET x"),
            [Command::Delete(FACE), Command::DeleteSet(2)]
        );
        assert_eq!(
            decode_all("DTIME", "S1M0 2.5;S1M1 N;S2M0 soon"),
            [
                Command::DeleteAfter(FACE, Some(2.5)),
                Command::DeleteAfter(MIRROR, None),
            ]
        );
    }

    #[test]
    fn test_parse_command_round_trip() {
        let mut server = AnimationServer::<4, 8>::new();
        assert!(server.insert(FACE, Eyes::default()).is_ok());

        assert!(server.parse_command("SET", "S1M0V100 0.5;0.25"));
        let angry = GlobalAddress::new(FACE, Emotion::Angry.attribute());
        let happy = GlobalAddress::new(FACE, Emotion::Happy.attribute());
        assert_eq!(server.read_float(angry), Some(0.5));
        assert_eq!(server.read_float(happy), Some(0.25));

        assert!(!server.parse_command("NOPE", "S1M0V100 1"));
        // Missing targets are skipped, the topic itself is fine
        assert!(server.parse_command("SET", "S9M9V0 1;S1M0V200 1"));
        assert_eq!(server.read_float(angry), Some(0.5));
    }

    #[test]
    fn test_parse_command_links() {
        let mut server = AnimationServer::<4, 8>::new();
        assert!(server.insert(FACE, Eyes::default()).is_ok());
        assert!(server.insert(MIRROR, Eyes::default()).is_ok());
        let source = GlobalAddress::new(FACE, IRIS_ATTRIBUTE);
        let mirror = GlobalAddress::new(MIRROR, IRIS_ATTRIBUTE);

        assert!(server.parse_command("SET", "S1M1V0 S1M0V0 1 2"));
        tick(&mut server, 0.02);
        assert_eq!(server.read_float(mirror), Some(7.0));

        // A bare value now moves the link's offset
        assert!(server.parse_command("SET", "S1M1V0 5"));
        tick(&mut server, 0.02);
        assert_eq!(server.read_float(mirror), Some(11.0));

        // Updating keeps the source
        assert!(server.parse_command("SET", "S1M1V0 0 1"));
        assert_eq!(server.copy_op(mirror).and_then(|op| op.source), Some(source));

        // A jump writes through the link until the next tick
        assert!(server.parse_command("SET", "S1M1V0 J9"));
        assert_eq!(server.read_float(mirror), Some(9.0));
    }

    #[test]
    fn test_parse_command_colors() {
        let mut server = AnimationServer::<4, 8>::new();
        assert!(server.insert(FACE, Eyes::default()).is_ok());
        let outer = GlobalAddress::new(FACE, 0);
        let blush = GlobalAddress::new(FACE, 2);

        assert!(server.parse_command("CSET", "S1M0V0 00FF00;N;N 00000000"));
        assert_eq!(
            server.resolve_color(outer).copied(),
            Some(Color::from_u32(0x00_FF00))
        );
        assert_eq!(server.resolve_color(blush).copied(), Some(Color::TRANSPARENT));

        assert!(server.parse_command("CSET", "S1M0V0 JFF0000 0000FF 2"));
        assert_eq!(
            server.resolve_color(outer).copied(),
            Some(Color::from_u32(0xFF_0000))
        );
        tick(&mut server, 0.25);
        let color = *server.resolve_color(outer).unwrap();
        assert!((color.r - 127.5).abs() < 1e-3);
        assert!((color.b - 127.5).abs() < 1e-3);
    }

    #[test]
    fn test_parse_command_text_and_delete() {
        let mut server = AnimationServer::<4, 8>::new();
        assert!(server.insert(FACE, Eyes::default()).is_ok());
        assert!(server.insert(LABEL, ScrollingText::default()).is_ok());

        assert!(server.parse_command("SSET", "S2M0 Hi there"));
        match server.find(LABEL) {
            Some(ElementSlot::Text(text)) => assert_eq!(text.text(), "Hi there"),
            other => panic!("unexpected element {other:?}"),
        }

        assert!(server.parse_command("DTIME", "S2M0 0.5"));
        assert_eq!(server.lifetime(LABEL), Some(Lifetime::Expires(0.5)));

        assert!(server.parse_command("DELETE", "SET 1"));
        assert!(server.find(FACE).is_none());
        tick(&mut server, 1.0);
        assert!(server.is_empty());
    }
}
