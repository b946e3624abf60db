//! PDF document assembly from processed images

use chrono::Utc;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::layout::{Page, plan_pages};
use crate::options::ConversionOptions;
use crate::types::*;

use super::process::{ProcessedImage, RasterData};

/// Title written into every generated document
pub const DOCUMENT_TITLE: &str = "Image Conversion";

/// Build the output document: one image XObject per input, pages laid out
/// by [`plan_pages`].
pub fn assemble_document(images: &[ProcessedImage], options: &ConversionOptions) -> Result<Document> {
    if images.is_empty() {
        return Err(ConvertError::EmptyInput(
            "No supported images found in selection.".to_string(),
        ));
    }

    let sources: Vec<SourceImage> = images.iter().map(ProcessedImage::source_image).collect();
    let pages = plan_pages(&sources, options)?;

    let mut doc = Document::with_version("1.7");
    let pages_tree_id = doc.new_object_id();

    let image_ids: Vec<ObjectId> = images
        .iter()
        .map(|image| add_image_xobject(&mut doc, image))
        .collect();

    let mut page_refs = Vec::with_capacity(pages.len());
    for page in &pages {
        let page_id = render_page(&mut doc, page, &image_ids, pages_tree_id);
        page_refs.push(Object::Reference(page_id));
    }

    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    doc.objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(document_info(options));
    doc.trailer.set("Info", info_id);

    log::info!("Assembled {} image(s) on {} page(s)", images.len(), count);
    Ok(doc)
}

fn document_info(options: &ConversionOptions) -> Dictionary {
    let mut info = Dictionary::new();
    info.set("Title", Object::string_literal(DOCUMENT_TITLE));
    if options.preserve_metadata {
        info.set(
            "Producer",
            Object::string_literal(format!("pdf-images {}", env!("CARGO_PKG_VERSION"))),
        );
        info.set(
            "CreationDate",
            Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
        );
    }
    info
}

fn add_image_xobject(doc: &mut Document, image: &ProcessedImage) -> ObjectId {
    let color_space = if image.data.components() == 1 {
        Object::Name(b"DeviceGray".to_vec())
    } else {
        Object::Name(b"DeviceRGB".to_vec())
    };

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(image.width as i64));
    dict.set("Height", Object::Integer(image.height as i64));
    dict.set("ColorSpace", color_space);
    dict.set("BitsPerComponent", Object::Integer(8));

    let content = match &image.data {
        RasterData::Jpeg { data, .. } => {
            dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
            data.clone()
        }
        RasterData::Flate { data, alpha, .. } => {
            dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
            if let Some(alpha) = alpha {
                let smask_id = doc.add_object(Stream::new(
                    Dictionary::from_iter(vec![
                        ("Type", Object::Name(b"XObject".to_vec())),
                        ("Subtype", Object::Name(b"Image".to_vec())),
                        ("Width", Object::Integer(image.width as i64)),
                        ("Height", Object::Integer(image.height as i64)),
                        ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
                        ("BitsPerComponent", Object::Integer(8)),
                        ("Filter", Object::Name(b"FlateDecode".to_vec())),
                    ]),
                    alpha.clone(),
                ));
                dict.set("SMask", Object::Reference(smask_id));
            }
            data.clone()
        }
    };

    // Already compressed; keep lopdf from compressing again
    let stream = Stream::new(dict, content).with_compression(false);
    doc.add_object(stream)
}

fn render_page(
    doc: &mut Document,
    page: &Page,
    image_ids: &[ObjectId],
    parent_pages_id: ObjectId,
) -> ObjectId {
    let mut content_ops = Vec::with_capacity(page.images.len());
    let mut xobjects = Dictionary::new();

    for placed in &page.images {
        let name = format!("Im{}", placed.image);
        xobjects.set(name.as_bytes(), Object::Reference(image_ids[placed.image]));

        // Image space is the unit square: scale it to the placed rectangle
        let rect = &placed.rect;
        content_ops.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            rect.width, rect.height, rect.x, rect.y, name
        ));
    }

    let content = content_ops.join("");
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page.size.width),
            Object::Real(page.size.height),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    doc.add_object(page_dict)
}
