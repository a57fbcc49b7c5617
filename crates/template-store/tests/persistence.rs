use soulfill_core_types::{Template, TemplateField};
use soulfill_template_store::{InMemoryTemplateStore, TemplateStore};

#[tokio::test]
async fn templates_survive_reopen() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("templates.json");

    let saved = {
        let store = InMemoryTemplateStore::with_persistence(&path)?;
        let mut template = Template::new("Shipping")
            .with_field(TemplateField::new("City", "Lisbon", ["town"]))
            .with_field(TemplateField::new("Postal Code", "1000-001", ["zip, postcode"]));
        template.is_default = true;
        store.save(template).await?
    };
    assert!(path.exists());

    let reopened = InMemoryTemplateStore::with_persistence(&path)?;
    let loaded = reopened.get(&saved.id).await?;
    assert_eq!(loaded, saved);
    assert_eq!(
        loaded.field("postal_code").map(|f| f.aliases.clone()),
        Some(vec![
            "zip".to_string(),
            "postcode".to_string(),
            "postal_code".to_string()
        ])
    );

    let extra = reopened.save(Template::new("Billing")).await?;
    let names: Vec<_> = reopened
        .list()
        .await?
        .into_iter()
        .map(|summary| summary.name)
        .collect();
    assert_eq!(names, vec!["Shipping", "Billing"]);
    assert_ne!(extra.id, saved.id);
    Ok(())
}

#[tokio::test]
async fn empty_file_opens_as_empty_store() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("templates.json");
    std::fs::write(&path, b"")?;
    let store = InMemoryTemplateStore::with_persistence(&path)?;
    assert!(store.list().await?.is_empty());
    Ok(())
}
