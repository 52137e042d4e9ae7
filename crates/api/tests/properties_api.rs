//! HTTP-level integration tests for the listing endpoints.
//!
//! Each test runs against a file-backed store and media root in its own
//! temporary directory, through the same router `main.rs` builds.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, body_text, build_test_app, delete, get, post_form, put_form, MultipartForm,
    ADMIN_PASS,
};
use serde_json::Value;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";
const MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-video";

fn flat_form() -> MultipartForm {
    MultipartForm::new()
        .text("title", "2BHK Flat")
        .text("description", "Sunny corner unit")
        .text("location", "Pune")
        .text("category", "buyers")
        .text("price", "2500000")
        .text("negotiable", "on")
        .text("bedrooms", "2")
        .text("bathrooms", "2")
        .text("carpetArea", "850")
        .text("builtupArea", "1000")
}

/// Sorted file names in `dir`.
fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_listing_saves_media_and_record() {
    let test = build_test_app().await;

    let form = flat_form()
        .file("images", "living room.png", PNG)
        .file("images", "kitchen.png", PNG)
        .file("videos", "tour.mp4", MP4);
    let response = post_form(test.app(), "/admin/upload-property", form).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let property = &json["property"];
    assert_eq!(json["id"], property["id"]);
    assert_eq!(property["title"], "2BHK Flat");
    assert_eq!(property["category"], "buyers");
    assert_eq!(property["price"], 2_500_000.0);
    assert_eq!(property["negotiable"], true);
    assert_eq!(property["bedrooms"], 2);
    assert_eq!(property["carpetArea"], 850.0);

    let images = strings(&property["images"]);
    let videos = strings(&property["videos"]);
    assert_eq!(images.len(), 2);
    assert_eq!(videos.len(), 1);
    for reference in images.iter() {
        assert!(reference.starts_with("/uploads/images/"));
        assert!(test.media_path(reference).exists());
    }
    assert!(images[0].ends_with("-living_room.png"));
    assert!(videos[0].starts_with("/uploads/videos/"));
    assert!(test.media_path(&videos[0]).exists());

    // Persisted in the data file.
    let id = json["id"].as_str().unwrap();
    let stored: Value =
        serde_json::from_slice(&std::fs::read(test.data_file()).unwrap()).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["id"], id);
}

#[tokio::test]
async fn create_with_only_video_link_is_accepted() {
    let test = build_test_app().await;

    let form = flat_form().text("videos", "https://youtube.com/shorts/abc");
    let response = post_form(test.app(), "/admin/uploads", form).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(
        strings(&json["property"]["videos"]),
        vec!["https://youtube.com/shorts/abc"]
    );
    assert!(strings(&json["property"]["images"]).is_empty());
}

#[tokio::test]
async fn create_without_media_is_rejected() {
    let test = build_test_app().await;

    let response = post_form(test.app(), "/admin/upload-property", flat_form()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let list = body_json(get(test.app(), "/admin/uploads").await).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_with_invalid_price_is_rejected() {
    let test = build_test_app().await;

    let form = flat_form()
        .text("price", "a lot")
        .file("images", "a.png", PNG);
    let response = post_form(test.app(), "/admin/upload-property", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn too_many_images_is_rejected() {
    let test = build_test_app().await;

    let mut form = flat_form();
    for i in 0..=test.config.max_images {
        form = form.file("images", &format!("{i}.png"), PNG);
    }
    let response = post_form(test.app(), "/admin/upload-property", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn store_failure_on_create_discards_saved_uploads() {
    let test = build_test_app().await;
    std::fs::remove_file(test.data_file()).unwrap();
    std::fs::create_dir_all(test.data_file()).unwrap();

    let form = flat_form()
        .file("images", "a.png", PNG)
        .file("images", "b.png", PNG)
        .file("videos", "tour.mp4", MP4);
    let response = post_form(test.app(), "/admin/upload-property", form).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(file_names(&test.uploads_dir().join("images")), Vec::<String>::new());
    assert_eq!(file_names(&test.uploads_dir().join("videos")), Vec::<String>::new());
}

#[tokio::test]
async fn local_path_as_video_link_is_rejected() {
    let test = build_test_app().await;

    let form = flat_form().text("videos", "/uploads/images/1-a.png");
    let response = post_form(test.app(), "/admin/upload-property", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn deleting_a_listing_never_touches_another_listings_media() {
    let test = build_test_app().await;

    let form = flat_form().file("images", "a.png", PNG);
    let first = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let first_image = strings(&first["property"]["images"])[0].clone();

    // Same path on a foreign host is just an external link.
    let link = format!("https://youtube.com{first_image}");
    let form = MultipartForm::new().text("title", "Second").text("videos", &link);
    let second = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let second_id = second["id"].as_str().unwrap();
    assert_eq!(strings(&second["property"]["videos"]), vec![link]);

    let response = delete(test.app(), &format!("/admin/delete/{second_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(test.media_path(&first_image).exists());
    let first_id = first["id"].as_str().unwrap();
    let fetched = body_json(get(test.app(), &format!("/admin/uploads/{first_id}")).await).await;
    assert_eq!(strings(&fetched["images"]), vec![first_image]);
}

#[tokio::test]
async fn legacy_type_field_sets_category() {
    let test = build_test_app().await;

    let form = MultipartForm::new()
        .text("title", "Shop")
        .text("type", "rentals")
        .file("images", "shop.png", PNG);
    let json = body_json(post_form(test.app(), "/admin/uploads", form).await).await;

    assert_eq!(json["property"]["category"], "rentals");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_filters_by_category() {
    let test = build_test_app().await;

    for (title, category) in [("A", "buyers"), ("B", "rentals"), ("C", "buyers")] {
        let form = MultipartForm::new()
            .text("title", title)
            .text("category", category)
            .file("images", "x.png", PNG);
        let response = post_form(test.app(), "/admin/uploads", form).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let all = body_json(get(test.app(), "/api/properties").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let buyers = body_json(get(test.app(), "/api/properties?category=buyers").await).await;
    let titles: Vec<&str> = buyers
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "C"]);

    let rentals = body_json(get(test.app(), "/properties/rentals").await).await;
    assert_eq!(rentals.as_array().unwrap().len(), 1);
    assert_eq!(rentals[0]["title"], "B");

    let none = body_json(get(test.app(), "/properties/commercial").await).await;
    assert!(none.as_array().unwrap().is_empty());

    let blank = body_json(get(test.app(), "/api/properties?category=").await).await;
    assert_eq!(blank.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn get_by_id_returns_listing_or_404() {
    let test = build_test_app().await;

    let form = flat_form().file("images", "a.png", PNG);
    let created = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let id = created["id"].as_str().unwrap();

    let response = get(test.app(), &format!("/admin/uploads/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "2BHK Flat");

    let response = get(test.app(), "/admin/uploads/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unreadable_data_file_degrades_to_empty_list() {
    let test = build_test_app().await;
    std::fs::write(test.data_file(), "{ not json").unwrap();

    let response = get(test.app(), "/api/properties").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!([]));
    // The corrupt file is left as it was.
    assert_eq!(
        std::fs::read_to_string(test.data_file()).unwrap(),
        "{ not json"
    );
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_overwrites_fields_and_appends_media() {
    let test = build_test_app().await;

    let form = flat_form().file("images", "a.png", PNG);
    let created = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let id = created["id"].as_str().unwrap();
    let first_image = strings(&created["property"]["images"])[0].clone();

    let form = MultipartForm::new()
        .text("price", "2400000")
        .text("title", "2BHK Flat (reduced)")
        .file("images", "b.png", PNG);
    let response = put_form(test.app(), &format!("/admin/uploads/{id}"), form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let property = &json["property"];
    assert_eq!(property["title"], "2BHK Flat (reduced)");
    assert_eq!(property["price"], 2_400_000.0);
    // Untouched fields survive.
    assert_eq!(property["location"], "Pune");
    assert_eq!(property["bedrooms"], 2);

    let images = strings(&property["images"]);
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], first_image);
    assert!(test.media_path(&images[1]).exists());
}

#[tokio::test]
async fn update_removes_exactly_the_listed_images() {
    let test = build_test_app().await;

    let form = flat_form()
        .file("images", "one.png", PNG)
        .file("images", "two.png", PNG)
        .file("images", "three.png", PNG)
        .file("images", "four.png", PNG);
    let created = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let id = created["id"].as_str().unwrap();
    let images = strings(&created["property"]["images"]);

    let form = MultipartForm::new().text(
        "removeImages",
        &format!("{}, {}", images[2], images[0]),
    );
    let response = put_form(test.app(), &format!("/admin/uploads/{id}"), form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        strings(&json["property"]["images"]),
        vec![images[1].clone(), images[3].clone()]
    );

    let mut expected: Vec<String> = [&images[1], &images[3]]
        .iter()
        .map(|r| r.rsplit('/').next().unwrap().to_string())
        .collect();
    expected.sort();
    assert_eq!(file_names(&test.uploads_dir().join("images")), expected);
}

#[tokio::test]
async fn update_removes_listed_videos_and_their_files() {
    let test = build_test_app().await;

    let form = flat_form()
        .file("videos", "one.mp4", MP4)
        .file("videos", "two.mp4", MP4)
        .text("videos", "https://youtube.com/shorts/keep");
    let created = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let id = created["id"].as_str().unwrap();
    let videos = strings(&created["property"]["videos"]);
    assert_eq!(videos.len(), 3);

    let removed = videos[0].clone();
    let kept = videos[1].clone();
    let form = MultipartForm::new().text(
        "removeVideos",
        &serde_json::to_string(&vec![removed.clone(), "/uploads/videos/unknown.mp4".to_string()])
            .unwrap(),
    );
    let response = put_form(test.app(), &format!("/admin/uploads/{id}"), form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        strings(&json["property"]["videos"]),
        vec![kept.clone(), "https://youtube.com/shorts/keep".to_string()]
    );
    assert_eq!(json["property"]["title"], "2BHK Flat");
    assert!(!test.media_path(&removed).exists());
    assert!(test.media_path(&kept).exists());
}

#[tokio::test]
async fn update_unknown_listing_returns_404() {
    let test = build_test_app().await;

    let form = MultipartForm::new().text("title", "Ghost");
    let response = put_form(test.app(), "/admin/uploads/missing", form).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_record_and_media_files() {
    let test = build_test_app().await;

    let form = flat_form()
        .file("images", "a.png", PNG)
        .file("videos", "tour.mp4", MP4);
    let created = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let id = created["id"].as_str().unwrap();
    let image = strings(&created["property"]["images"])[0].clone();
    let video = strings(&created["property"]["videos"])[0].clone();

    let response = delete(test.app(), &format!("/admin/delete-property/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    assert!(!test.media_path(&image).exists());
    assert!(!test.media_path(&video).exists());

    let response = get(test.app(), &format!("/admin/uploads/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(test.app(), &format!("/admin/delete/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_get_delete_round_trip() {
    let test = build_test_app().await;

    let form = MultipartForm::new()
        .text("title", "2BHK Flat")
        .file("images", "a.jpg", b"jpeg-bytes")
        .file("images", "b.png", PNG);
    let created = body_json(post_form(test.app(), "/admin/upload-property", form).await).await;
    let id = created["id"].as_str().unwrap().to_string();
    let images = strings(&created["property"]["images"]);
    assert!(images[0].starts_with("/uploads/images/") && images[0].ends_with("-a.jpg"));
    assert!(images[1].starts_with("/uploads/images/") && images[1].ends_with("-b.png"));

    let fetched = body_json(get(test.app(), &format!("/admin/uploads/{id}")).await).await;
    assert_eq!(fetched, created["property"]);

    let response = delete(test.app(), &format!("/admin/delete-property/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(test.app(), &format!("/admin/uploads/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    for reference in &images {
        assert!(!test.media_path(reference).exists());
    }
}

#[tokio::test]
async fn delete_tolerates_already_missing_files() {
    let test = build_test_app().await;

    let form = flat_form().file("images", "a.png", PNG);
    let created = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let id = created["id"].as_str().unwrap();
    let image = strings(&created["property"]["images"])[0].clone();
    std::fs::remove_file(test.media_path(&image)).unwrap();

    let response = delete(test.app(), &format!("/admin/delete/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Static media and site
// ---------------------------------------------------------------------------

#[tokio::test]
async fn uploaded_media_is_served_under_uploads() {
    let test = build_test_app().await;

    let form = flat_form().file("images", "a.png", PNG);
    let created = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let image = strings(&created["property"]["images"])[0].clone();

    let response = get(test.app(), &image).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    assert_eq!(&bytes[..], PNG);
}

#[tokio::test]
async fn sitemap_lists_static_pages_and_listings() {
    let test = build_test_app().await;

    let form = flat_form().file("images", "a.png", PNG);
    let created = body_json(post_form(test.app(), "/admin/uploads", form).await).await;
    let id = created["id"].as_str().unwrap();

    let response = get(test.app(), "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/xml"
    );

    let xml = body_text(response).await;
    assert!(xml.contains("<loc>https://estates.example/</loc>"));
    assert!(xml.contains("<loc>https://estates.example/about.html</loc>"));
    assert!(xml.contains(&format!(
        "<loc>https://estates.example/property-details.html?id={id}</loc>"
    )));
    assert_eq!(xml.matches("<url>").count(), 5);
}

#[tokio::test]
async fn sitemap_falls_back_to_static_pages_when_store_fails() {
    let test = build_test_app().await;
    std::fs::write(test.data_file(), "{ not json").unwrap();

    let response = get(test.app(), "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);

    let xml = body_text(response).await;
    assert_eq!(xml.matches("<url>").count(), 4);
    assert!(!xml.contains("property-details.html"));
}

#[tokio::test]
async fn admin_page_requires_pass() {
    let test = build_test_app().await;
    let page_dir = test.config.public_dir.join("admin");
    std::fs::create_dir_all(&page_dir).unwrap();
    std::fs::write(page_dir.join("property-upload.html"), "<h1>Upload</h1>").unwrap();

    let response = get(test.app(), "/admin/property-upload").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(test.app(), "/admin/property-upload?pass=wrong").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(test.app(), &format!("/admin/property-upload?pass={ADMIN_PASS}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h1>Upload</h1>");
}

#[tokio::test]
async fn public_dir_serves_site_pages() {
    let test = build_test_app().await;
    std::fs::write(test.config.public_dir.join("about.html"), "about us").unwrap();

    let response = get(test.app(), "/about.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "about us");

    let response = get(test.app(), "/nope.html").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
