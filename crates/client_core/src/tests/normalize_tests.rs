use super::*;
use serde_json::json;

#[test]
fn item_accepts_flat_reference_ids() {
    let item = decode_item(json!({
        "itemId": 1,
        "itemName": "Lamp",
        "categoryId": 5,
        "locationId": 9,
        "status": "Unclaimed",
    }))
    .expect("item");

    assert_eq!(item.item_id, ItemId(1));
    assert_eq!(item.category_id, Some(CategoryId(5)));
    assert_eq!(item.location_id, Some(LocationId(9)));
    assert_eq!(item.status, Some(ItemStatus::Unclaimed));
}

#[test]
fn item_accepts_nested_reference_objects_in_either_spelling() {
    let by_id = decode_item(json!({
        "id": "2",
        "itemName": "Umbrella",
        "category": { "id": 5, "categoryName": "Accessories" },
        "location": { "locationId": "9", "locationBuilding": "A", "locationFloor": "2" },
    }))
    .expect("item");

    assert_eq!(by_id.item_id, ItemId(2));
    assert_eq!(by_id.category_id, Some(CategoryId(5)));
    assert_eq!(by_id.location_id, Some(LocationId(9)));

    let by_category_id = decode_item(json!({
        "itemId": 3,
        "itemName": "Scarf",
        "category": { "categoryId": 6 },
        "location": { "id": 10 },
    }))
    .expect("item");

    assert_eq!(by_category_id.category_id, Some(CategoryId(6)));
    assert_eq!(by_category_id.location_id, Some(LocationId(10)));
}

#[test]
fn flat_reference_wins_over_nested_object() {
    let item = decode_item(json!({
        "itemId": 4,
        "categoryId": 7,
        "category": { "id": 8 },
    }))
    .expect("item");

    assert_eq!(item.category_id, Some(CategoryId(7)));
    assert_eq!(item.location_id, None);
}

#[test]
fn item_keeps_missing_status_apart_from_unrecognized_status() {
    let missing = decode_item(json!({ "itemId": 1, "status": null })).expect("item");
    let odd = decode_item(json!({ "itemId": 2, "status": "Lost" })).expect("item");

    assert_eq!(missing.status, None);
    assert_eq!(odd.status, Some(ItemStatus::Unrecognized("Lost".to_string())));
}

#[test]
fn item_dates_accept_plain_dates_and_timestamps() {
    let plain = decode_item(json!({ "itemId": 1, "date": "2024-03-05" })).expect("item");
    let stamped =
        decode_item(json!({ "itemId": 2, "date": "2024-03-05T10:00:00Z" })).expect("item");
    let empty = decode_item(json!({ "itemId": 3, "date": "" })).expect("item");
    let garbage = decode_item(json!({ "itemId": 4, "date": "soon" })).expect("item");

    let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
    assert_eq!(plain.date_added, expected);
    assert_eq!(stamped.date_added, expected);
    assert_eq!(empty.date_added, None);
    assert_eq!(garbage.date_added, None);
}

#[test]
fn item_without_identifier_is_rejected() {
    let err = decode_item(json!({ "itemName": "Ghost" })).expect_err("must fail");
    assert_eq!(
        err,
        ShapeError::MissingIdentifier {
            kind: EntityKind::Item
        }
    );
}

#[test]
fn category_and_location_accept_both_field_spellings() {
    let category = decode_category(json!({ "categoryId": "5", "categoryName": "Electronics" }))
        .expect("category");
    assert_eq!(category.category_id, CategoryId(5));
    assert_eq!(category.name, "Electronics");

    let location = decode_location(json!({ "id": 9, "building": "A", "floor": "2" }))
        .expect("location");
    assert_eq!(location.location_id, LocationId(9));
    assert_eq!(location.display_name(), "A - 2");
}

#[test]
fn collection_drops_only_malformed_records() {
    let items = decode_collection(
        EntityKind::Item,
        vec![
            json!({ "itemId": 1, "itemName": "Lamp" }),
            json!("not an object"),
            json!({ "itemName": "No id" }),
            json!({ "itemId": 2, "itemName": "Desk" }),
        ],
        decode_item,
    );

    let ids: Vec<ItemId> = items.iter().map(|item| item.item_id).collect();
    assert_eq!(ids, vec![ItemId(1), ItemId(2)]);
}

#[test]
fn mistyped_fields_do_not_drop_the_record() {
    let items = decode_collection(
        EntityKind::Item,
        vec![
            json!({ "itemId": 1, "itemName": "Lamp", "categoryId": 5, "locationId": 9, "status": 1 }),
            json!({ "itemId": 2, "itemName": "Desk", "category": 5, "location": "9" }),
            json!({ "itemId": 3, "itemName": 42, "description": ["x"], "date": 20240305 }),
            json!({ "itemId": 4, "itemName": "Chair", "category": true, "locationId": {} }),
        ],
        decode_item,
    );

    let ids: Vec<ItemId> = items.iter().map(|item| item.item_id).collect();
    assert_eq!(ids, vec![ItemId(1), ItemId(2), ItemId(3), ItemId(4)]);

    assert_eq!(items[0].status, Some(ItemStatus::Unrecognized("1".to_string())));
    assert_eq!(items[1].category_id, Some(CategoryId(5)));
    assert_eq!(items[1].location_id, Some(LocationId(9)));
    assert_eq!(items[2].name, "42");
    assert_eq!(items[2].description, None);
    assert_eq!(items[2].date_added, None);
    assert_eq!(items[3].category_id, None);
    assert_eq!(items[3].location_id, None);
}

#[test]
fn mistyped_category_and_location_fields_keep_the_identifier() {
    let category = decode_category(json!({ "categoryId": 5, "categoryName": 12 }))
        .expect("category");
    assert_eq!(category.name, "12");

    let location = decode_location(json!({ "locationId": "9", "building": null, "floor": 2 }))
        .expect("location");
    assert_eq!(location.location_id, LocationId(9));
    assert_eq!(location.building, "");
    assert_eq!(location.floor, "2");

    let err = decode_location(json!({ "locationId": [9], "building": "A" })).expect_err("no id");
    assert_eq!(
        err,
        ShapeError::MissingIdentifier {
            kind: EntityKind::Location
        }
    );
}
