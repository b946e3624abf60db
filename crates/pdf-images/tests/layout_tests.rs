use pdf_images::*;

fn a4() -> Size {
    resolve_page_size(PageSizePreset::A4, None, None, None, None).unwrap()
}

#[test]
fn test_four_up_a4_grid() {
    let grid = resolve_grid(LayoutPreset::Four, 0.25).unwrap();
    assert_eq!((grid.columns, grid.rows, grid.capacity), (2, 2, 4));
    assert!((grid.margin_x - 18.0).abs() < 1e-4);
    assert!((grid.gutter_x - 9.0).abs() < 1e-4);
    assert!((grid.gutter_y - 9.0).abs() < 1e-4);

    let slot = grid.slot_size(a4());
    let expected = (8.27 * 72.0 - 36.0 - 9.0) / 2.0;
    assert!((slot.width - expected).abs() < 0.01);
    assert!((slot.width - 275.22).abs() < 0.01);
}

#[test]
fn test_no_margin_uses_fallback_gutter() {
    let grid = resolve_grid(LayoutPreset::Four, 0.0).unwrap();
    assert_eq!(grid.margin_x, 0.0);
    assert_eq!(grid.gutter_x, 12.0);

    let grid = resolve_grid(LayoutPreset::One, 0.0).unwrap();
    assert_eq!(grid.gutter_x, 0.0);
    assert_eq!(grid.gutter_y, 0.0);
}

#[test]
fn test_non_finite_margin_rejected() {
    assert!(matches!(
        resolve_grid(LayoutPreset::Two, f32::NAN),
        Err(ConvertError::Config(_))
    ));
}

#[test]
fn test_tightening() {
    let four = resolve_grid(LayoutPreset::Four, 0.25).unwrap();
    let three = tighten_grid(&four, 3);
    assert_eq!((three.columns, three.rows, three.capacity), (2, 2, 3));

    let two = resolve_grid(LayoutPreset::Two, 0.25).unwrap();
    let one = tighten_grid(&two, 1);
    assert_eq!((one.columns, one.rows, one.capacity), (1, 1, 1));

    let pair = tighten_grid(&four, 2);
    assert_eq!((pair.columns, pair.rows), (2, 1));
}

#[test]
fn test_tighten_full_grid_is_identity() {
    for preset in [LayoutPreset::One, LayoutPreset::Two, LayoutPreset::Four] {
        let grid = resolve_grid(preset, 0.5).unwrap();
        assert_eq!(tighten_grid(&grid, grid.capacity), grid);
    }
}

#[test]
fn test_slots_stay_inside_margins() {
    let page = a4();
    let grid = resolve_grid(LayoutPreset::Four, 0.25).unwrap();
    for index in 0..grid.capacity {
        let rect = grid.slot_bounds(grid.position(index), page);
        assert!(rect.x >= grid.margin_x - 1e-3);
        assert!(rect.y >= grid.margin_y - 1e-3);
        assert!(rect.right() <= page.width - grid.margin_x + 1e-3);
        assert!(rect.top() <= page.height - grid.margin_y + 1e-3);
    }

    // First slot is top-left
    let first = grid.slot_bounds(grid.position(0), page);
    let last = grid.slot_bounds(grid.position(3), page);
    assert!(first.x < last.x);
    assert!(first.y > last.y);
}

#[test]
fn test_scaling_modes() {
    let slot = Rect::new(0.0, 0.0, 400.0, 300.0);

    let fit = fit_image(&slot, 800, 300, ScalingMode::FitPage);
    assert!((fit.scale - 0.5).abs() < 1e-6);

    let fit = fit_image(&slot, 800, 300, ScalingMode::FitWidth);
    assert!((fit.scale - 0.5).abs() < 1e-6);
    let fit = fit_image(&slot, 200, 300, ScalingMode::FitWidth);
    assert!((fit.scale - 1.0).abs() < 1e-6);

    let fit = fit_image(&slot, 200, 100, ScalingMode::OriginalSize);
    assert!((fit.scale - 1.0).abs() < 1e-6);
    let fit = fit_image(&slot, 800, 800, ScalingMode::OriginalSize);
    assert!((fit.scale - 0.375).abs() < 1e-6);
}

#[test]
fn test_aspect_ratio_preserved() {
    let slot = Rect::new(10.0, 20.0, 275.0, 390.0);
    for mode in [
        ScalingMode::FitPage,
        ScalingMode::FitWidth,
        ScalingMode::OriginalSize,
    ] {
        for (w, h) in [(3000, 2000), (640, 480), (100, 900), (1, 1)] {
            let fit = fit_image(&slot, w, h, mode);
            let expected = w as f32 / h as f32;
            let actual = fit.rect.width / fit.rect.height;
            assert!((actual - expected).abs() / expected < 1e-4);
        }
    }
}

#[test]
fn test_original_page_size() {
    let size =
        resolve_page_size(PageSizePreset::Original, None, None, Some((3000, 2000)), Some(300.0))
            .unwrap();
    assert!((size.width - 720.0).abs() < 1e-3);
    assert!((size.height - 480.0).abs() < 1e-3);
}

#[test]
fn test_pagination_order() {
    let items: Vec<usize> = (0..5).collect();
    let pages = paginate(&items, 4);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0], &[0, 1, 2, 3]);
    assert_eq!(pages[1], &[4]);
}

#[test]
fn test_plan_pages_two_up() {
    let options = ConversionOptions {
        page_layout: LayoutPreset::Two,
        ..Default::default()
    };
    let images = vec![SourceImage::new(1200, 800, None); 3];
    let pages = plan_pages(&images, &options).unwrap();

    assert_eq!(pages.len(), 2);
    let order: Vec<usize> = pages
        .iter()
        .flat_map(|page| page.images.iter().map(|placed| placed.image))
        .collect();
    assert_eq!(order, vec![0, 1, 2]);

    // The top image of a page sits above the bottom one
    let top = &pages[0].images[0].rect;
    let bottom = &pages[0].images[1].rect;
    assert!(top.y > bottom.top());
}

#[test]
fn test_resample_plan_is_idempotent() {
    let options = ConversionOptions {
        page_size: PageSizePreset::Letter,
        target_dpi: Some(150.0),
        ..Default::default()
    };
    let image = SourceImage::new(3000, 2000, None);

    let first = plan_resample(&image, &options).unwrap();
    let second = plan_resample(&image, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(image, SourceImage::new(3000, 2000, None));
    assert_eq!(
        first,
        ResamplePlan::Resize {
            max_width: 1200,
            max_height: 1575
        }
    );
    assert_eq!(first.apply(3000, 2000), (1200, 800));
}
