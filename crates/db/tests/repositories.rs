//! Repository tests against a real database.

use chrono::{Duration, NaiveDate, Utc};
use opvang_core::document_kind::DocumentType;
use opvang_core::staff_grid::{GridCell, StaffAssignment};
use opvang_core::youth_overview::{FieldChange, TabLocation};
use opvang_db::models::administrative_document::CreateAdministrativeDocument;
use opvang_db::models::invitation::CreateInvitation;
use opvang_db::models::resident::{CreateResident, UpdateResident};
use opvang_db::repositories::{
    AdministrativeDocumentRepo, GridRepo, InvitationRepo, ResidentRepo, StaffRepo,
    YouthOverviewRepo,
};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_resident(badge: i32, first: &str, last: &str) -> CreateResident {
    CreateResident {
        badge,
        first_name: first.to_string(),
        last_name: last.to_string(),
        room: None,
        nationality: None,
        ov_number: None,
        register_number: None,
        date_of_birth: None,
        age: None,
        gender: None,
        reference_person: None,
        date_in: None,
        date_out: None,
        days_of_stay: None,
        status: None,
        remarks: None,
        room_remarks: None,
        photo_url: None,
    }
}

fn new_document(resident_id: Option<i64>, kind: DocumentType, name: &str) -> CreateAdministrativeDocument {
    CreateAdministrativeDocument {
        resident_id,
        document_type: kind,
        file_name: name.to_string(),
        file_path: format!("{}/{name}", kind.as_str()),
        file_size: Some(10),
        mime_type: Some("application/pdf".into()),
        description: None,
        uploaded_by: None,
        resident_badge: None,
        resident_name: None,
        storage_path: None,
    }
}

fn change(field: &'static str, value: &str) -> FieldChange {
    FieldChange {
        field,
        value: Some(value.to_string()),
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

// ---------------------------------------------------------------------------
// Residents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_resident_crud(pool: PgPool) {
    let created = ResidentRepo::create(&pool, &new_resident(24191, " John ", "Doe"))
        .await
        .unwrap();
    assert_eq!(created.first_name, "John");

    let update = UpdateResident {
        room: Some("12B".into()),
        ..Default::default()
    };
    let updated = ResidentRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.room.as_deref(), Some("12B"));
    assert_eq!(updated.last_name, "Doe");

    let found = ResidentRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(found.map(|r| r.badge), Some(24191));

    assert!(ResidentRepo::delete(&pool, created.id).await.unwrap());
    assert!(!ResidentRepo::delete(&pool, created.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_residents_listed_by_badge(pool: PgPool) {
    ResidentRepo::create(&pool, &new_resident(300, "C", "Three")).await.unwrap();
    ResidentRepo::create(&pool, &new_resident(100, "A", "One")).await.unwrap();
    ResidentRepo::create(&pool, &new_resident(200, "B", "Two")).await.unwrap();

    let badges: Vec<i32> = ResidentRepo::list(&pool)
        .await
        .unwrap()
        .iter()
        .map(|r| r.badge)
        .collect();
    assert_eq!(badges, vec![100, 200, 300]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_badge_is_unique_violation(pool: PgPool) {
    ResidentRepo::create(&pool, &new_resident(5, "A", "B")).await.unwrap();
    let err = ResidentRepo::create(&pool, &new_resident(5, "C", "D"))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_residents_badge"));
}

// ---------------------------------------------------------------------------
// Administrative documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_resident_orphans_documents(pool: PgPool) {
    let resident = ResidentRepo::create(&pool, &new_resident(7, "Ann", "Lee")).await.unwrap();
    let doc = AdministrativeDocumentRepo::create(
        &pool,
        &new_document(Some(resident.id), DocumentType::In, "a.pdf"),
    )
    .await
    .unwrap();

    ResidentRepo::delete(&pool, resident.id).await.unwrap();

    let orphans = AdministrativeDocumentRepo::list_orphans(&pool, DocumentType::In)
        .await
        .unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, doc.id);
    assert!(orphans[0].resident_id.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_documents_filtered_by_type(pool: PgPool) {
    let resident = ResidentRepo::create(&pool, &new_resident(8, "Bo", "Ng")).await.unwrap();
    for (kind, name) in [
        (DocumentType::In, "in1.pdf"),
        (DocumentType::In, "in2.pdf"),
        (DocumentType::Out, "out.pdf"),
    ] {
        AdministrativeDocumentRepo::create(&pool, &new_document(Some(resident.id), kind, name))
            .await
            .unwrap();
    }

    let all = AdministrativeDocumentRepo::list_by_resident(&pool, resident.id, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    // Newest first.
    assert_eq!(all[0].file_name, "out.pdf");

    let out = AdministrativeDocumentRepo::list_by_resident(&pool, resident.id, Some(DocumentType::Out))
        .await
        .unwrap();
    assert_eq!(out.len(), 1);

    let mut names = AdministrativeDocumentRepo::file_names_by_type(&pool, DocumentType::In)
        .await
        .unwrap();
    names.sort();
    assert_eq!(names, vec!["in1.pdf", "in2.pdf"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_and_relocate_document(pool: PgPool) {
    let resident = ResidentRepo::create(&pool, &new_resident(9, "Cy", "Do")).await.unwrap();
    let doc = AdministrativeDocumentRepo::create(&pool, &new_document(None, DocumentType::In, "x.pdf"))
        .await
        .unwrap();

    let assigned = AdministrativeDocumentRepo::assign_resident(&pool, doc.id, resident.id, "9", "Cy Do")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assigned.resident_id, Some(resident.id));
    assert_eq!(assigned.resident_name.as_deref(), Some("Cy Do"));

    let moved = AdministrativeDocumentRepo::update_location(&pool, doc.id, "IN/9_Cy_Do/x.pdf", "IN/9_Cy_Do/x.pdf")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.blob_path(), "IN/9_Cy_Do/x.pdf");
}

// ---------------------------------------------------------------------------
// Youth overview
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_only_touches_given_fields(pool: PgPool) {
    YouthOverviewRepo::upsert(&pool, "101", &[change("naam", "Doe"), change("referent", "Eva")])
        .await
        .unwrap();
    YouthOverviewRepo::upsert(&pool, "101", &[change("naam", "Dao")])
        .await
        .unwrap();

    let row = YouthOverviewRepo::find_by_badge(&pool, "101").await.unwrap().unwrap();
    assert_eq!(row.naam.as_deref(), Some("Dao"));
    assert_eq!(row.referent.as_deref(), Some("Eva"));
    assert_eq!(row.tab_location, "IN");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_fields_and_tab_filter(pool: PgPool) {
    let rows = vec![
        ("1".to_string(), vec![change("naam", "A")]),
        ("2".to_string(), vec![change("naam", "B")]),
    ];
    assert_eq!(YouthOverviewRepo::upsert_many(&pool, &rows).await.unwrap(), 2);

    let updated = YouthOverviewRepo::update_fields(&pool, "2", &[change("tab_location", "OUT")])
        .await
        .unwrap();
    assert!(updated);
    assert!(!YouthOverviewRepo::update_fields(&pool, "3", &[change("naam", "C")])
        .await
        .unwrap());

    let out = YouthOverviewRepo::list(&pool, Some(TabLocation::Out)).await.unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].badge, "2");
    assert_eq!(YouthOverviewRepo::list(&pool, None).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_age_verification_filters_results(pool: PgPool) {
    YouthOverviewRepo::upsert(&pool, "1", &[change("resultaat", "Meerderjarig")]).await.unwrap();
    YouthOverviewRepo::upsert(&pool, "2", &[change("resultaat", "onbekend")]).await.unwrap();
    YouthOverviewRepo::upsert(&pool, "3", &[]).await.unwrap();

    let rows = YouthOverviewRepo::age_verification(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].badge, "1");
}

// ---------------------------------------------------------------------------
// Toewijzingen
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_upsert_replaces_position(pool: PgPool) {
    let first = StaffAssignment {
        assignment_date: day(1),
        position: 1,
        name: "Els".into(),
    };
    StaffRepo::upsert(&pool, &first).await.unwrap();
    StaffRepo::upsert(&pool, &StaffAssignment { name: "Tom".into(), ..first.clone() })
        .await
        .unwrap();

    let staff = StaffRepo::list(&pool, Some(day(1))).await.unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0].staff_name, "Tom");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_name_unique_per_day(pool: PgPool) {
    let els = |position| StaffAssignment {
        assignment_date: day(2),
        position,
        name: "Els".into(),
    };
    StaffRepo::upsert(&pool, &els(1)).await.unwrap();
    let err = StaffRepo::upsert(&pool, &els(2)).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_staff_name_per_date"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grid_upsert_and_delete(pool: PgPool) {
    let cell = |row, column, name: &str| GridCell {
        assignment_date: day(3),
        row_number: row,
        column_number: column,
        resident_name: name.to_string(),
        color_status: None,
    };
    GridRepo::upsert(&pool, &cell(1, 0, "Ann")).await.unwrap();
    GridRepo::upsert(&pool, &cell(0, 1, "Bo")).await.unwrap();
    GridRepo::upsert(&pool, &cell(1, 0, "Cy")).await.unwrap();

    let cells = GridRepo::list(&pool, Some(day(3))).await.unwrap();
    assert_eq!(cells.len(), 2);
    assert_eq!((cells[0].row_number, cells[0].resident_name.as_str()), (0, "Bo"));
    assert_eq!(cells[1].resident_name, "Cy");

    assert_eq!(GridRepo::delete_cell(&pool, day(3), 0, 1).await.unwrap(), 1);
    assert_eq!(GridRepo::delete_by_resident(&pool, "Cy", None).await.unwrap(), 1);
    assert!(GridRepo::list(&pool, None).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_invitation_once(pool: PgPool) {
    InvitationRepo::allow_domain(&pool, "Center.be").await.unwrap();
    assert!(InvitationRepo::is_domain_allowed(&pool, "center.be").await.unwrap());
    assert!(!InvitationRepo::is_domain_allowed(&pool, "gmail.com").await.unwrap());

    let invitation = InvitationRepo::create(
        &pool,
        &CreateInvitation {
            token: "tok-1".into(),
            email: "jan@center.be".into(),
            role: "staff".into(),
            expires_at: Utc::now() + Duration::days(7),
            created_by: None,
        },
    )
    .await
    .unwrap();

    let found = InvitationRepo::find_active(&pool, "tok-1", "jan@center.be")
        .await
        .unwrap();
    assert_eq!(found.map(|i| i.id), Some(invitation.id));
    assert!(InvitationRepo::find_active(&pool, "tok-1", "other@center.be")
        .await
        .unwrap()
        .is_none());

    let user = Uuid::new_v4();
    let profile = InvitationRepo::complete(&pool, invitation.id, user, "staff")
        .await
        .unwrap()
        .unwrap();
    assert!(profile.is_approved);
    assert_eq!(profile.invitation_id, Some(invitation.id));

    let again = InvitationRepo::complete(&pool, invitation.id, Uuid::new_v4(), "staff")
        .await
        .unwrap();
    assert!(again.is_none());
}
