use crate::options::ConversionOptions;
use crate::types::*;

/// Calculate page counts for converting `image_count` images
pub fn calculate_statistics(
    image_count: usize,
    options: &ConversionOptions,
) -> Result<ConversionStatistics> {
    options.validate()?;

    if image_count == 0 {
        return Err(ConvertError::EmptyInput(
            "No input files provided.".to_string(),
        ));
    }

    let images_per_page = options.page_capacity();
    let pages = image_count.div_ceil(images_per_page);
    let last_page_images = image_count - (pages - 1) * images_per_page;

    Ok(ConversionStatistics {
        images: image_count,
        images_per_page,
        pages,
        last_page_images,
    })
}
