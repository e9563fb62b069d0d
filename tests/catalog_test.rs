use retro_pc::catalog::{LocalOffset, PartRole, Rgb, Shape, Variant};

#[test]
fn classic_catalog_matches_the_published_model() {
    let parts = Variant::Classic.parts();
    let names: Vec<_> = parts.iter().map(|part| part.name).collect();
    assert_eq!(
        names,
        [
            "monitor_body",
            "bezel",
            "display_screen",
            "top_ridge",
            "stand",
            "stand_base",
            "keyboard",
            "keyboard_detail",
        ]
    );

    let body = &parts[0];
    assert_eq!(
        body.shape,
        Shape::Box {
            width: 4.2,
            height: 3.2,
            depth: 1.8
        }
    );
    assert_eq!(body.color, Rgb(0xe0dfd5));
    assert_eq!(body.offset, LocalOffset::ORIGIN);

    let screen = &parts[2];
    assert_eq!(
        screen.shape,
        Shape::Plane {
            width: 3.4,
            height: 2.4
        }
    );
    assert_eq!(screen.offset.translation, [0.0, 0.0, 0.91]);
    assert_eq!(screen.role, PartRole::DisplaySurface);

    let keyboard = &parts[6];
    assert_eq!(keyboard.offset.translation, [0.0, -2.9, 2.0]);
    assert_eq!(keyboard.offset.rotation, [-0.1, 0.0, 0.0]);
    assert_eq!(keyboard.color, Rgb(0x404040));
}

#[test]
fn every_variant_has_exactly_one_display_surface() {
    for variant in Variant::ALL {
        let surfaces = variant
            .parts()
            .iter()
            .filter(|part| part.is_display_surface())
            .count();
        assert_eq!(surfaces, 1, "{} variant", variant);
    }
}

#[test]
fn every_variant_validates() {
    for variant in Variant::ALL {
        assert_eq!(retro_pc::assembler::validate(variant.parts()), Ok(()));
    }
}

#[test]
fn variants_parse_case_insensitively() {
    assert_eq!("classic".parse::<Variant>().unwrap(), Variant::Classic);
    assert_eq!(" Compact ".parse::<Variant>().unwrap(), Variant::Compact);
    assert!("tower".parse::<Variant>().is_err());
    assert_eq!(Variant::default(), Variant::Classic);
}

#[test]
fn variants_point_at_their_video() {
    assert_eq!(
        Variant::Classic.video_url(),
        "https://domae-space.github.io/3d-viewer-project/public/video/domaevideo.mp4"
    );
    assert_eq!(Variant::Compact.video_url(), "public/video/domaevideo.mp4");
}

#[test]
fn compact_case_uses_its_own_palette() {
    let palette = Variant::Compact.palette();
    let body = Variant::Compact.parts()[0];
    assert_eq!(body.color, palette.case);
    assert_ne!(palette, Variant::Classic.palette());
}

#[test]
fn colours_convert_to_linear_light() {
    assert_eq!(Rgb(0xffffff).to_linear(), [1.0, 1.0, 1.0]);
    assert_eq!(Rgb(0x000000).to_linear(), [0.0, 0.0, 0.0]);
    let [r, g, b] = Rgb(0x333333).to_linear();
    assert!((r - 0.0331).abs() < 1e-3);
    assert_eq!(r, g);
    assert_eq!(g, b);
    assert_eq!(Rgb(0xe0dfd5).channels(), [0xe0, 0xdf, 0xd5]);
    assert_eq!(Rgb(0x2f2f2f).to_string(), "#2f2f2f");
}
