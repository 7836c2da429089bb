use serde::Serialize;
use shared::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageAnimation {
    Slide,
    Fade,
}

/// Display options for the member photo gallery
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryOptions {
    pub width: String,
    pub height: String,
    pub image_percent: u32,
    pub thumbnails_columns: u32,
    pub image_animation: ImageAnimation,
    pub preview: bool,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            width: "500px".to_string(),
            height: "500px".to_string(),
            image_percent: 100,
            thumbnails_columns: 4,
            image_animation: ImageAnimation::Slide,
            preview: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub small: String,
    pub medium: String,
    pub big: String,
}

/// A member together with the gallery built from their photos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberDetail {
    pub member: Member,
    pub options: GalleryOptions,
    pub images: Vec<GalleryImage>,
}

impl MemberDetail {
    pub fn new(member: Member) -> Self {
        let images = gallery_images(&member);
        Self {
            member,
            options: GalleryOptions::default(),
            images,
        }
    }
}

/// One image per photo, in photo order; every size uses the photo URL.
pub fn gallery_images(member: &Member) -> Vec<GalleryImage> {
    member
        .photos
        .iter()
        .map(|photo| GalleryImage {
            small: photo.url.clone(),
            medium: photo.url.clone(),
            big: photo.url.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_photo_becomes_an_image() {
        let member: Member = serde_json::from_value(serde_json::json!({
            "id": 3,
            "username": "karen",
            "photos": [
                {"id": 10, "url": "https://img/a.jpg", "isMain": true},
                {"id": 11, "url": "https://img/b.jpg"}
            ]
        }))
        .unwrap();

        let detail = MemberDetail::new(member);
        assert_eq!(detail.images.len(), 2);
        assert_eq!(detail.images[1].small, "https://img/b.jpg");
        assert_eq!(detail.images[1].big, "https://img/b.jpg");
        assert_eq!(detail.options.thumbnails_columns, 4);
        assert!(!detail.options.preview);
    }
}
