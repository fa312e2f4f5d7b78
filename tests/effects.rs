mod tests {
    use embassy_time::Duration;
    use myrtio_light_effects::{
        BlendsConfig, ColorTwinklesConfig, EffectConfig, EffectKind, EffectSlot, Error, Lifecycle,
        Palette, PresetPalette, RandomField, StarsConfig, TwinkleFoxConfig,
        color::{BLACK, Rgb, Rgbw, blend_rgbw, rgbw, scale_color, to_rgbw},
        effect::{
            BlendsEffect, ColorTwinklesEffect, Effect, FrameContext, StarsEffect, TwinkleFoxEffect,
        },
    };
    use myrtio_light_effects::math8::scale8;
    use proptest::prelude::*;

    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    fn preset(preset: PresetPalette) -> Palette {
        Palette::from_entries(preset.colors()).unwrap()
    }

    fn ctx(palette: &Palette, seed: u32) -> FrameContext<'_> {
        FrameContext {
            palette,
            field: RandomField::new(seed),
        }
    }

    #[test]
    fn test_stars_full_probability_lights_every_pixel() {
        let color = rgbw(10, 20, 30, 40);
        let config = StarsConfig::default().with_probability(100.0).with_color(color);
        let mut effect = StarsEffect::<16>::new(&config, 16).unwrap();
        let palette = Palette::solid(Rgb::default());
        let mut leds = [BLACK; 16];

        effect.render(&ctx(&palette, 1), Duration::from_millis(16), &mut leds);

        assert_eq!(leds, [color; 16]);
    }

    #[test]
    fn test_stars_zero_probability_shows_background() {
        let background = rgbw(1, 2, 3, 4);
        let config = StarsConfig::default()
            .with_probability(0.0)
            .with_background(background);
        let mut effect = StarsEffect::<16>::new(&config, 16).unwrap();
        let palette = Palette::solid(Rgb::default());
        let mut leds = [BLACK; 16];

        for _ in 0..1000 {
            effect.render(&ctx(&palette, 1), Duration::from_millis(16), &mut leds);
            assert_eq!(leds, [background; 16]);
        }
    }

    #[test]
    fn test_stars_black_color_means_white() {
        let config = StarsConfig::default().with_probability(100.0);
        let mut effect = StarsEffect::<4>::new(&config, 4).unwrap();
        let palette = Palette::solid(Rgb::default());
        let mut leds = [BLACK; 4];

        effect.render(&ctx(&palette, 1), Duration::from_millis(16), &mut leds);

        assert_eq!(leds, [rgbw(255, 255, 255, 0); 4]);
    }

    #[test]
    fn test_stars_decay_between_ignitions() {
        let config = StarsConfig::default().with_probability(2.0);
        let mut effect = StarsEffect::<32>::new(&config, 32).unwrap();
        let palette = Palette::solid(Rgb::default());
        let white = rgbw(255, 255, 255, 0);
        let mut leds = [BLACK; 32];
        let mut previous = [0u8; 32];
        let (mut ignited, mut faded_out) = (false, false);

        for _ in 0..600 {
            effect.render(&ctx(&palette, 8), Duration::from_millis(16), &mut leds);

            for (i, &brightness) in effect.state().pixels().iter().enumerate() {
                if brightness == 255 {
                    ignited = true;
                } else {
                    // One decay step per frame, floored at zero
                    assert_eq!(brightness, scale8(previous[i], 224));
                    faded_out |= previous[i] > 0 && brightness == 0;
                }
                assert_eq!(leds[i], blend_rgbw(BLACK, white, brightness));
                previous[i] = brightness;
            }
        }

        assert!(ignited);
        assert!(faded_out);
    }

    #[test]
    fn test_stars_same_frames_at_any_tick_rate() {
        let config = StarsConfig::default().with_probability(10.0);
        let palette = Palette::solid(Rgb::default());
        let mut coarse = StarsEffect::<64>::new(&config, 64).unwrap();
        let mut fine = StarsEffect::<64>::new(&config, 64).unwrap();
        let mut coarse_leds = [BLACK; 64];
        let mut fine_leds = [BLACK; 64];

        let mut lit = 0usize;
        for _ in 0..250 {
            coarse.render(&ctx(&palette, 4), Duration::from_millis(16), &mut coarse_leds);
            for _ in 0..16 {
                fine.render(&ctx(&palette, 4), Duration::from_millis(1), &mut fine_leds);
            }

            assert_eq!(coarse.state().pixels(), fine.state().pixels());
            assert_eq!(coarse_leds, fine_leds);
            lit += coarse.state().pixels().iter().filter(|&&b| b > 0).count();
        }
        assert!(lit > 0);
    }

    #[test]
    fn test_lifecycle_moves_forward_only() {
        let mut effect = StarsEffect::<4>::new(&StarsConfig::default(), 4).unwrap();
        let palette = Palette::solid(Rgb::default());
        let mut leds = [BLACK; 4];
        assert_eq!(effect.lifecycle(), Lifecycle::Idle);

        effect.render(&ctx(&palette, 1), Duration::from_millis(16), &mut leds);
        assert_eq!(effect.lifecycle(), Lifecycle::Running);

        effect.stop();
        assert_eq!(effect.lifecycle(), Lifecycle::Stopped);

        // Stopped instances leave the buffer alone
        let mut untouched = [rgbw(9, 9, 9, 9); 4];
        effect.render(&ctx(&palette, 1), Duration::from_millis(16), &mut untouched);
        assert_eq!(untouched, [rgbw(9, 9, 9, 9); 4]);
        assert_eq!(effect.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn test_state_larger_than_capacity() {
        assert_eq!(
            StarsEffect::<4>::new(&StarsConfig::default(), 5).err(),
            Some(Error::DimensionMismatch {
                strip: 5,
                capacity: 4
            })
        );
        assert!(EffectSlot::<4>::from_config(&EffectConfig::default_for(EffectKind::Blends), 5)
            .is_err());
    }

    #[test]
    fn test_short_buffer_renders_prefix() {
        let config = StarsConfig::default().with_probability(100.0);
        let mut effect = StarsEffect::<8>::new(&config, 8).unwrap();
        let palette = Palette::solid(Rgb::default());
        let mut leds = [BLACK; 3];

        effect.render(&ctx(&palette, 1), Duration::from_millis(16), &mut leds);

        assert_eq!(leds, [rgbw(255, 255, 255, 0); 3]);
        assert_eq!(effect.state().len(), 8);
    }

    #[test]
    fn test_default_configs_render_one_frame() {
        let kinds = [
            EffectKind::Stars,
            EffectKind::TwinkleFox,
            EffectKind::ColorTwinkles,
            EffectKind::Blends,
        ];
        for kind in kinds {
            let config = EffectConfig::default_for(kind);
            let palette = preset(kind.default_palette());
            let mut slot = EffectSlot::<30>::from_config(&config, 30).unwrap();
            let mut leds = [rgbw(1, 1, 1, 1); 30];

            slot.render(&ctx(&palette, 3), Duration::from_millis(20), &mut leds);

            assert_eq!(slot.kind(), kind);
            assert_eq!(slot.lifecycle(), Lifecycle::Running);
            assert!(leds.iter().all(|led| *led != rgbw(1, 1, 1, 1)));
        }
    }

    #[test]
    fn test_effect_kind_names() {
        assert_eq!(
            EffectKind::parse_from_str("addressable_twinklefox"),
            Some(EffectKind::TwinkleFox)
        );
        assert_eq!(EffectKind::from_raw(3), Some(EffectKind::Blends));
        assert_eq!(EffectKind::from_raw(4), None);
        assert_eq!(EffectKind::Stars.as_str(), "addressable_stars");
        assert_eq!(
            EffectKind::ColorTwinkles.as_str(),
            "addressable_color_twinkles"
        );
    }

    #[test]
    fn test_twinkle_fox_is_deterministic() {
        let config = TwinkleFoxConfig::default().with_density(8).with_speed(8);
        let palette = preset(PresetPalette::PartyColors);
        let mut a = TwinkleFoxEffect::<24>::new(&config, 24).unwrap();
        let mut b = TwinkleFoxEffect::<24>::new(&config, 24).unwrap();
        let mut leds_a = [BLACK; 24];
        let mut leds_b = [BLACK; 24];

        let mut lit = false;
        for ms in [0, 16, 17, 15, 33, 16, 250, 16] {
            let dt = Duration::from_millis(ms);
            a.render(&ctx(&palette, 99), dt, &mut leds_a);
            b.render(&ctx(&palette, 99), dt, &mut leds_b);
            assert_eq!(leds_a, leds_b);
            lit |= leds_a.iter().any(|led| *led != BLACK);
        }
        assert!(lit);
    }

    #[test]
    fn test_twinkle_fox_auto_background() {
        let config = TwinkleFoxConfig::default().with_auto_background(true);
        let palette = preset(PresetPalette::IceColors);
        let mut effect = TwinkleFoxEffect::<8>::new(&config, 8).unwrap();
        let mut leds = [BLACK; 8];

        effect.render(&ctx(&palette, 5), Duration::from_millis(16), &mut leds);

        assert_eq!(effect.background(), scale_color(palette.average(), 16));
        assert!(effect.state().pixels().iter().all(|p| (8..=23).contains(&p.speed_mult)));
    }

    #[test]
    fn test_twinkle_fox_clock_ignores_tick_size() {
        let config = TwinkleFoxConfig::default().with_speed(8);
        let palette = preset(PresetPalette::PartyColors);
        let mut small = TwinkleFoxEffect::<32>::new(&config, 32).unwrap();
        let mut large = TwinkleFoxEffect::<32>::new(&config, 32).unwrap();
        let mut leds = [BLACK; 32];

        small.render(&ctx(&palette, 6), Duration::from_ticks(0), &mut leds);
        large.render(&ctx(&palette, 6), Duration::from_ticks(0), &mut leds);

        for _ in 0..16_000 {
            small.render(&ctx(&palette, 6), Duration::from_micros(125), &mut leds);
        }
        large.render(&ctx(&palette, 6), Duration::from_secs(2), &mut leds);

        assert_eq!(small.state().pixels(), large.state().pixels());
        for pixel in large.state().pixels() {
            let expected = 2_000_000 * u32::from(pixel.speed_mult) / 1000;
            assert_eq!(pixel.clock.wrapping_sub(pixel.offset), expected);
        }
    }

    /// Share of lit pixels over 300 frames of a white TwinkleFox
    fn twinkle_fox_lit_share(density: u8) -> f32 {
        let config = TwinkleFoxConfig::default()
            .with_speed(8)
            .with_density(density)
            .with_cool_like_incandescent(false);
        let palette = Palette::solid(WHITE);
        let mut effect = TwinkleFoxEffect::<128>::new(&config, 128).unwrap();
        let mut leds = [BLACK; 128];

        let mut lit = 0usize;
        for _ in 0..300 {
            effect.render(&ctx(&palette, 21), Duration::from_millis(97), &mut leds);
            lit += leds.iter().filter(|&&led| led != BLACK).count();
        }
        lit as f32 / (300.0 * 128.0)
    }

    #[test]
    fn test_twinkle_fox_density_sets_lit_share() {
        for density in [1u8, 4, 8] {
            let expected = f32::from(density) / 8.0;
            let share = twinkle_fox_lit_share(density);
            assert!(
                (share - expected).abs() < 0.05,
                "density {density}: lit share {share}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_twinkle_fox_cooling_warms_fading_twinkles() {
        let base = TwinkleFoxConfig::default().with_speed(8).with_density(8);
        let palette = Palette::solid(WHITE);
        let mut warm =
            TwinkleFoxEffect::<32>::new(&base.clone().with_cool_like_incandescent(true), 32)
                .unwrap();
        let mut plain =
            TwinkleFoxEffect::<32>::new(&base.with_cool_like_incandescent(false), 32).unwrap();
        let mut warm_leds = [BLACK; 32];
        let mut plain_leds = [BLACK; 32];

        let mut cooled = false;
        for _ in 0..100 {
            warm.render(&ctx(&palette, 13), Duration::from_millis(23), &mut warm_leds);
            plain.render(&ctx(&palette, 13), Duration::from_millis(23), &mut plain_leds);

            for (w, p) in warm_leds.iter().zip(plain_leds.iter()) {
                assert_eq!(w.r, p.r);
                assert!(w.g <= p.g && w.b <= p.b);
                assert!(w.g >= w.b);
                cooled |= w.b < p.b;
            }
        }
        assert!(cooled);
    }

    #[test]
    fn test_twinkle_fox_fixed_background_under_idle_pixels() {
        let background = Rgb::new(0, 0, 40);
        let config = TwinkleFoxConfig::default()
            .with_density(1)
            .with_background(background);
        let palette = Palette::solid(WHITE);
        let mut effect = TwinkleFoxEffect::<128>::new(&config, 128).unwrap();
        let mut leds = [BLACK; 128];

        for _ in 0..20 {
            effect.render(&ctx(&palette, 2), Duration::from_millis(16), &mut leds);

            assert_eq!(effect.background(), background);
            assert!(leds.iter().all(|&led| led != BLACK));
            let idle = leds.iter().filter(|&&led| led == to_rgbw(background)).count();
            assert!(idle >= 64, "only {idle} pixels show the background");
        }
    }

    #[test]
    fn test_twinkle_fox_auto_background_follows_palette() {
        let config = TwinkleFoxConfig::default().with_auto_background(true);
        let red = Palette::solid(Rgb::new(255, 0, 0));
        let green = Palette::solid(Rgb::new(0, 255, 0));
        let mut effect = TwinkleFoxEffect::<8>::new(&config, 8).unwrap();
        let mut leds = [BLACK; 8];

        effect.render(&ctx(&red, 5), Duration::from_millis(16), &mut leds);
        assert_eq!(effect.background(), Rgb::new(16, 0, 0));

        effect.render(&ctx(&green, 5), Duration::from_millis(16), &mut leds);
        assert_eq!(effect.background(), Rgb::new(0, 16, 0));
    }

    #[test]
    fn test_color_twinkles_trace() {
        let config = ColorTwinklesConfig::default();
        let palette = Palette::solid(WHITE);
        let mut effect = ColorTwinklesEffect::<1>::new(&config, 1).unwrap();
        let mut leds = [BLACK; 1];

        let mut trace = Vec::new();
        for _ in 0..12 {
            effect.render(&ctx(&palette, 11), Duration::from_millis(40), &mut leds);
            trace.push(leds[0].r);
        }

        assert_eq!(trace, [32, 64, 44, 24, 4, 0, 32, 64, 44, 24, 4, 0]);
    }

    #[test]
    fn test_color_twinkles_wait_for_a_full_step() {
        let palette = Palette::solid(WHITE);
        let mut effect = ColorTwinklesEffect::<1>::new(&ColorTwinklesConfig::default(), 1).unwrap();
        let mut leds = [BLACK; 1];

        effect.render(&ctx(&palette, 11), Duration::from_millis(25), &mut leds);
        assert_eq!(leds[0], BLACK);

        // Remainder carries over: 25 + 25 ms make one step
        effect.render(&ctx(&palette, 11), Duration::from_millis(25), &mut leds);
        assert_eq!(leds[0].r, 32);
    }

    #[test]
    fn test_blends_frozen_when_cycle_is_zero() {
        let config = BlendsConfig::default().with_cycle_s(0);
        let palette = preset(PresetPalette::RainbowColors);
        let mut effect = BlendsEffect::<32>::new(&config, 32).unwrap();
        let mut first = [BLACK; 32];
        let mut second = [BLACK; 32];

        effect.render(&ctx(&palette, 1), Duration::from_millis(16), &mut first);
        effect.render(&ctx(&palette, 1), Duration::from_millis(500), &mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn test_blends_spreads_palette_along_strip() {
        let config = BlendsConfig::default().with_scale(8);
        let palette = preset(PresetPalette::RainbowColors);
        let mut effect = BlendsEffect::<32>::new(&config, 32).unwrap();
        let mut leds = [BLACK; 32];

        effect.render(&ctx(&palette, 1), Duration::from_ticks(0), &mut leds);

        for (i, led) in leds.iter().enumerate() {
            assert_eq!(*led, to_rgbw(palette.sample((i * 8) as u8)));
        }
    }

    #[test]
    fn test_blends_smoothing_eases_towards_target() {
        let config = BlendsConfig::default().with_cycle_s(1).with_smoothing(64);
        let palette = preset(PresetPalette::RainbowColors);
        let mut smooth = BlendsEffect::<8>::new(&config, 8).unwrap();
        let mut sharp = BlendsEffect::<8>::new(&config.clone().with_smoothing(0), 8).unwrap();
        let mut smooth_leds = [BLACK; 8];
        let mut sharp_leds = [BLACK; 8];

        // First frame is never smoothed
        smooth.render(&ctx(&palette, 1), Duration::from_ticks(0), &mut smooth_leds);
        sharp.render(&ctx(&palette, 1), Duration::from_ticks(0), &mut sharp_leds);
        assert_eq!(smooth_leds, sharp_leds);

        smooth.render(&ctx(&palette, 1), Duration::from_millis(250), &mut smooth_leds);
        sharp.render(&ctx(&palette, 1), Duration::from_millis(250), &mut sharp_leds);
        assert_ne!(smooth_leds, sharp_leds);
    }

    #[test]
    fn test_config_ranges() {
        assert_eq!(
            TwinkleFoxConfig::default().with_speed(9).validate(),
            Err(Error::ConfigRange {
                field: "twinkle_speed",
                value: 9.0,
                min: 1.0,
                max: 8.0
            })
        );
        assert!(TwinkleFoxConfig::default().with_density(0).validate().is_err());
        assert!(StarsConfig::default().with_probability(100.5).validate().is_err());
        assert!(StarsConfig::default().with_probability(f32::NAN).validate().is_err());
        assert!(ColorTwinklesConfig::default().with_fade_in_speed(0).validate().is_err());
        assert!(BlendsConfig::default().with_cycle_s(21).validate().is_err());
        assert!(BlendsConfig::default().with_scale(65).validate().is_err());
        assert!(BlendsConfig::default().with_scale(0).validate().is_err());
        assert!(
            EffectSlot::<8>::from_config(&BlendsConfig::default().with_scale(0).into(), 8).is_err()
        );
    }

    #[test]
    fn test_percent_colors() {
        use myrtio_light_effects::config::{rgb_from_percent, rgbw_from_percent};

        assert_eq!(
            rgbw_from_percent(100.0, 50.0, 0.0, 0.0),
            Ok(rgbw(255, 128, 0, 0))
        );
        assert_eq!(rgb_from_percent(0.0, 0.0, 100.0), Ok(Rgb::new(0, 0, 255)));
        assert!(rgbw_from_percent(0.0, 0.0, 0.0, 120.0).is_err());
    }

    proptest! {
        #[test]
        fn color_twinkles_trace_is_unimodal(
            peak in 1u8..=255,
            fade_in in 1u8..=255,
            fade_out in 1u8..=255,
            seed in any::<u32>(),
        ) {
            let config = ColorTwinklesConfig::default()
                .with_starting_brightness(peak)
                .with_fade_in_speed(fade_in)
                .with_fade_out_speed(fade_out);
            let palette = Palette::solid(WHITE);
            let mut effect = ColorTwinklesEffect::<1>::new(&config, 1).unwrap();
            let mut leds: [Rgbw; 1] = [BLACK; 1];

            let mut trace = Vec::new();
            for _ in 0..600 {
                effect.render(&ctx(&palette, seed), Duration::from_millis(40), &mut leds);
                trace.push(leds[0].r);
                if leds[0].r == 0 {
                    break;
                }
            }

            prop_assert_eq!(trace.last().copied(), Some(0));
            let top = trace.iter().position(|&v| v == *trace.iter().max().unwrap()).unwrap();
            prop_assert!(trace[..=top].windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(trace[top..].windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
