use flowcanvas_core::db::open_db_in_memory;
use flowcanvas_core::service::workflow_editor::{
    FIRST_WORKFLOW_DESCRIPTION, FIRST_WORKFLOW_NAME, IMPORT_FAILED_MESSAGE,
};
use flowcanvas_core::storage::workflow_storage::WORKFLOWS_KEY;
use flowcanvas_core::{
    EditorError, Position, SqliteWorkflowStorage, StepType, StoreError, TransferError,
    WorkflowEditor, WorkflowStorage,
};
use rusqlite::params;

#[test]
fn bootstrap_seeds_first_workflow_and_saves_it() {
    let conn = open_db_in_memory().unwrap();
    let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());

    editor.bootstrap();

    let store = editor.store();
    assert!(!store.is_loading());
    assert_eq!(store.workflows().len(), 1);
    let first = store.current_workflow().unwrap();
    assert_eq!(first.name, FIRST_WORKFLOW_NAME);
    assert_eq!(first.description.as_deref(), Some(FIRST_WORKFLOW_DESCRIPTION));

    let storage = SqliteWorkflowStorage::try_new(&conn).unwrap();
    assert_eq!(storage.load_workflows().unwrap().map(|list| list.len()), Some(1));
    assert_eq!(storage.load_current_workflow_id().unwrap(), Some(first.id));
}

#[test]
fn bootstrap_restores_saved_state() {
    let conn = open_db_in_memory().unwrap();
    let (kept_id, node_id) = {
        let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());
        editor.bootstrap();
        let kept_id = editor
            .apply(|store| store.create_workflow("Second", None))
            .unwrap();
        let node_id = editor
            .apply(|store| {
                store.add_catalog_node(StepType::Processing, "email_send", Position::default())
            })
            .unwrap();
        (kept_id, node_id)
    };

    let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());
    editor.bootstrap();

    let store = editor.store();
    assert_eq!(store.workflows().len(), 2);
    assert_eq!(store.current_workflow_id(), Some(kept_id));
    assert!(store.current_workflow().unwrap().node(node_id).is_some());
}

#[test]
fn bootstrap_surfaces_corrupt_storage_and_starts_empty() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, '[{]', 0);",
        params![WORKFLOWS_KEY],
    )
    .unwrap();
    let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());

    editor.bootstrap();

    assert!(editor.store().workflows().is_empty());
    assert!(editor.store().error().is_some());
    assert!(!editor.store().is_loading());
}

#[test]
fn export_without_current_workflow_fails() {
    let conn = open_db_in_memory().unwrap();
    let editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());
    let dir = tempfile::tempdir().unwrap();

    match editor.export_current(dir.path()).unwrap_err() {
        EditorError::Store(StoreError::NoCurrentWorkflow) => {}
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn exported_file_imports_as_new_current_workflow() {
    let conn = open_db_in_memory().unwrap();
    let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());
    editor.bootstrap();
    editor
        .apply(|store| {
            store.add_catalog_node(StepType::Output, "database_insert", Position::new(4.0, 2.0))
        })
        .unwrap();
    let original_id = editor.store().current_workflow_id().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let path = editor.export_current(dir.path()).unwrap();
    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("My First Workflow-"));
    assert!(file_name.ends_with(".json"));

    let imported_id = editor.import_from_file(&path).unwrap();

    assert_ne!(imported_id, original_id);
    let store = editor.store();
    assert_eq!(store.current_workflow_id(), Some(imported_id));
    assert_eq!(store.workflows().len(), 2);
    let imported = store.current_workflow().unwrap();
    assert_eq!(imported.name, FIRST_WORKFLOW_NAME);
    assert_eq!(imported.nodes.len(), 1);

    let storage = SqliteWorkflowStorage::try_new(&conn).unwrap();
    assert_eq!(storage.load_current_workflow_id().unwrap(), Some(imported_id));
}

#[test]
fn failed_import_sets_error_and_keeps_list() {
    let conn = open_db_in_memory().unwrap();
    let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());
    editor.bootstrap();

    let err = editor
        .import_from_str(r#"{"id":"a","nodes":[],"edges":[]}"#)
        .unwrap_err();

    assert!(matches!(
        err,
        EditorError::Transfer(TransferError::MissingField("name"))
    ));
    assert_eq!(editor.store().error(), Some(IMPORT_FAILED_MESSAGE));
    assert_eq!(editor.store().workflows().len(), 1);

    let missing = tempfile::tempdir().unwrap().path().join("gone.json");
    assert!(matches!(
        editor.import_from_file(missing).unwrap_err(),
        EditorError::Io(_)
    ));
}

#[test]
fn deleting_last_workflow_survives_reload() {
    let conn = open_db_in_memory().unwrap();
    let only = {
        let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());
        editor.bootstrap();
        let only = editor.store().current_workflow_id().unwrap();
        editor.apply(|store| store.delete_workflow(only)).unwrap();
        only
    };

    let storage = SqliteWorkflowStorage::try_new(&conn).unwrap();
    assert_eq!(storage.load_workflows().unwrap(), Some(Vec::new()));
    assert_eq!(storage.load_current_workflow_id().unwrap(), None);

    let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());
    editor.bootstrap();

    let store = editor.store();
    assert!(store.workflows().is_empty());
    assert!(store.workflow(only).is_none());
    assert_eq!(store.current_workflow_id(), None);
    assert_eq!(store.error(), None);
}

#[test]
fn import_accepts_hand_written_id() {
    let conn = open_db_in_memory().unwrap();
    let mut editor = WorkflowEditor::new(SqliteWorkflowStorage::try_new(&conn).unwrap());
    editor.bootstrap();

    let imported_id = editor
        .import_from_str(r#"{"id":"my-flow","name":"Flow","nodes":[],"edges":[]}"#)
        .unwrap();

    let store = editor.store();
    assert_eq!(store.error(), None);
    assert_eq!(store.current_workflow_id(), Some(imported_id));
    assert_eq!(store.current_workflow().unwrap().name, "Flow");
}
