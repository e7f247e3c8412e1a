//! End-to-end flow over the in-memory storage service: classification
//! changes driving the stage gate, schema-driven record CRUD, selection
//! bookkeeping, investment totals, attachments, and the audit merge.

use casefile_calc::{selection, summarize, InvestmentLine, PriceCatalog, SelectionBoard};
use casefile_client::{
    AttachmentManager, AttachmentScope, AuditTrail, InMemoryStorage, RecordStore, RefreshMode,
};
use casefile_gating::StageGate;
use casefile_types::{
    Classification, FieldDef, FieldType, Group, Modality, Record, SessionContext,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

fn session() -> SessionContext {
    SessionContext::new("tok-123", "analyst-1", "Ana Rojas", "analyst")
}

fn stamped(case_id: Uuid, fields: &[(&str, serde_json::Value)]) -> Record {
    let mut record = Record::draft();
    for (name, value) in fields {
        record.set(*name, value.clone());
    }
    record.stamp(case_id, "analyst-1");
    record
}

#[test]
fn classification_drives_gate_and_modality_unblocks_one_stage() {
    let mut gate = StageGate::with_default_catalog();

    // Intake: nothing classified yet, everything visible, Data active.
    let view = gate.apply_classification(Classification::unset());
    assert_eq!(view.active, "datos");
    assert!(view.stages.iter().all(|t| !t.blocked));

    // Analyst opens Credit, then the case is classified Group 3 without a
    // modality: Credit stays on screen but greyed out, active falls back.
    gate.navigate("credito").unwrap();
    let view = gate.apply_classification(Classification::new(Some(Group::Three), None));
    assert_eq!(view.active, "datos");
    assert!(view.stages.iter().find(|t| t.stage == "credito").unwrap().blocked);

    // The beneficiary picks lease payment: Lease opens up, the other two
    // mechanisms stay blocked.
    let class = Classification::new(
        Some(Group::Three),
        Modality::from_label("Pago de canon de arrendamiento"),
    );
    let view = gate.apply_classification(class);
    let blocked: Vec<&str> = view
        .stages
        .iter()
        .filter(|t| t.blocked)
        .map(|t| t.stage.as_str())
        .collect();
    assert_eq!(blocked, vec!["credito", "formulacion_proveeduria"]);
    gate.navigate("arrendamiento").unwrap();
}

#[tokio::test]
async fn investment_stage_records_selection_and_totals() {
    let api = Arc::new(InMemoryStorage::new());
    let case_id = Uuid::new_v4();
    api.seed_schema(
        "plan_inversion",
        vec![
            FieldDef::new("id", FieldType::Number),
            FieldDef::new("case_id", FieldType::Number),
            FieldDef::new("categoria", FieldType::Select)
                .with_options(vec!["maquinaria".into(), "insumos".into()]),
            FieldDef::new("item", FieldType::Text),
            FieldDef::new("cantidad", FieldType::Number),
            FieldDef::new("valor_unitario", FieldType::Decimal),
        ],
    )
    .await;

    let store = RecordStore::new(api.clone(), session(), "plan_inversion", case_id);
    let schema = store.discover_schema().await.unwrap();
    let visible: Vec<&str> = schema.visible_fields().map(|f| f.name.as_str()).collect();
    assert_eq!(visible, vec!["categoria", "item", "cantidad", "valor_unitario"]);

    // Four proposed investments.
    for (item, qty) in [("motobomba", 2), ("guadaña", 1), ("abono", 10), ("malla", 4)] {
        store
            .upsert(
                stamped(
                    case_id,
                    &[
                        ("categoria", "maquinaria".into()),
                        ("item", item.into()),
                        ("cantidad", qty.into()),
                    ],
                ),
                RefreshMode::Refetch,
            )
            .await
            .unwrap();
    }
    let records = store.current().await;
    assert_eq!(records.len(), 4);

    // Shortlist three; the fourth selection is rejected and its flag
    // reverts with no order assigned.
    let mut board = SelectionBoard::from_records(&records);
    let ids: Vec<i64> = records.iter().map(|r| r.id.unwrap()).collect();
    for id in &ids[..3] {
        let order = board.select(*id).unwrap();
        let mut record = records.iter().find(|r| r.id == Some(*id)).unwrap().clone();
        selection::apply_selection(&mut record, Some(order));
        store.upsert(record, RefreshMode::PatchInPlace).await.unwrap();
    }
    assert!(board.select(ids[3]).is_err());
    assert_eq!(board.occupied(), vec![1, 2, 3]);

    // Totals over the selected shortlist against the Group 3 ceiling.
    let mut catalog = PriceCatalog::new();
    catalog.insert("motobomba".to_string(), dec!(850));
    catalog.insert("guadaña".to_string(), dec!(1200));
    catalog.insert("abono".to_string(), dec!(95));

    let lines: Vec<InvestmentLine> = store
        .current()
        .await
        .iter()
        .filter(|r| r.get_bool(selection::FIELD_SELECTED) == Some(true))
        .filter_map(|r| InvestmentLine::from_record(r, &catalog))
        .collect();
    assert_eq!(lines.len(), 3);

    let summary = summarize(&lines, dec!(3000));
    assert_eq!(summary.grand_total, dec!(2) * dec!(850) + dec!(1200) + dec!(10) * dec!(95));
    assert_eq!(summary.counterpart, summary.grand_total - dec!(3000));
}

#[tokio::test]
async fn attachments_bind_to_records_and_audit_merges_newest_first() {
    let api = Arc::new(InMemoryStorage::new());
    let case_id = Uuid::new_v4();
    let store = RecordStore::new(api.clone(), session(), "credito", case_id);

    let first = store
        .upsert(
            stamped(case_id, &[("entidad", "banco agrario".into())]),
            RefreshMode::PatchInPlace,
        )
        .await
        .unwrap();
    let second = store
        .upsert(
            stamped(case_id, &[("entidad", "cooperativa".into())]),
            RefreshMode::PatchInPlace,
        )
        .await
        .unwrap();

    let files = AttachmentManager::new(api.clone(), session(), "credito", case_id);
    files
        .upload(
            AttachmentScope::Record(first.id.unwrap()),
            b"estado de cuenta",
            "extracto",
            "pdf",
        )
        .await
        .unwrap();

    let bound = files
        .list(AttachmentScope::Record(first.id.unwrap()))
        .await
        .unwrap();
    assert_eq!(bound.len(), 1);
    assert!(files
        .list(AttachmentScope::Record(second.id.unwrap()))
        .await
        .unwrap()
        .is_empty());

    // Edit the first record so its history outgrows the second's.
    let mut edited = first.clone();
    edited.set("entidad", "banco agrario - sede norte");
    store.upsert(edited, RefreshMode::PatchInPlace).await.unwrap();

    let audit = AuditTrail::new(api, session(), "credito");
    let merged = audit
        .history(&[first.id.unwrap(), second.id.unwrap()])
        .await
        .unwrap();
    assert_eq!(merged.len(), 3);
    assert!(merged.windows(2).all(|pair| pair[0].at >= pair[1].at));
}
