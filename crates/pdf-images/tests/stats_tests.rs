use pdf_images::*;

#[test]
fn test_statistics_four_up() {
    let options = ConversionOptions {
        page_layout: LayoutPreset::Four,
        ..Default::default()
    };
    let stats = calculate_statistics(5, &options).unwrap();
    assert_eq!(stats.images, 5);
    assert_eq!(stats.images_per_page, 4);
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.last_page_images, 1);
}

#[test]
fn test_statistics_exact_fill() {
    let options = ConversionOptions {
        page_layout: LayoutPreset::Two,
        ..Default::default()
    };
    let stats = calculate_statistics(6, &options).unwrap();
    assert_eq!(stats.pages, 3);
    assert_eq!(stats.last_page_images, 2);
}

#[test]
fn test_statistics_original_is_one_per_page() {
    let options = ConversionOptions {
        page_size: PageSizePreset::Original,
        page_layout: LayoutPreset::Four,
        ..Default::default()
    };
    let stats = calculate_statistics(3, &options).unwrap();
    assert_eq!(stats.images_per_page, 1);
    assert_eq!(stats.pages, 3);
}

#[test]
fn test_statistics_matches_page_plan() {
    let options = ConversionOptions {
        page_layout: LayoutPreset::Four,
        ..Default::default()
    };
    let images = vec![SourceImage::new(640, 480, Some(72.0)); 7];
    let stats = calculate_statistics(images.len(), &options).unwrap();
    let pages = plan_pages(&images, &options).unwrap();

    assert_eq!(pages.len(), stats.pages);
    assert_eq!(
        pages.last().map(|page| page.images.len()),
        Some(stats.last_page_images)
    );
}

#[test]
fn test_statistics_empty_input() {
    let result = calculate_statistics(0, &ConversionOptions::default());
    assert!(matches!(result, Err(ConvertError::EmptyInput(_))));
}
