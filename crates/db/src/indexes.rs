use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index_unique(bson::doc! { "username": 1 }),
        ],
    )
    .await?;

    // Webinars
    create_indexes(
        db,
        "webinars",
        vec![
            index(bson::doc! { "host_id": 1, "scheduled_at": -1 }),
            index(bson::doc! { "status": 1, "scheduled_at": 1 }),
        ],
    )
    .await?;

    // Attendees. The unique (webinar_id, email) index is what makes
    // registration atomic: concurrent registers race on the insert, and the
    // loser surfaces as a duplicate-key error instead of a second row.
    create_indexes(
        db,
        "attendees",
        vec![
            index_unique(bson::doc! { "webinar_id": 1, "email": 1 }),
            index(bson::doc! { "webinar_id": 1, "status": 1 }),
            index(bson::doc! { "webinar_id": 1, "user_id": 1 }),
        ],
    )
    .await?;

    // Leads
    create_indexes(
        db,
        "leads",
        vec![index(bson::doc! { "webinar_id": 1, "created_at": -1 })],
    )
    .await?;

    // Sales
    create_indexes(
        db,
        "sales",
        vec![
            index_unique(bson::doc! { "stripe_session_id": 1 }),
            index(bson::doc! { "webinar_id": 1, "created_at": -1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
