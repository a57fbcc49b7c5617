use std::collections::HashSet;

use soulfill_core_types::{normalize_aliases, slugify, FieldDescriptor, Template, TemplateField};

/// Builds an unsaved template from fields harvested in an import session.
///
/// Keys are slugs of each field's caption; repeated slugs get `_2`, `_3`… suffixes. Aliases come
/// from name, label, placeholder and key. Values are the fields' current contents.
pub fn seed_template(name: &str, fields: &[FieldDescriptor]) -> Template {
    let mut used: HashSet<String> = HashSet::new();
    let mut template = Template::new(name.trim());

    for field in fields {
        let caption = field.caption();
        let base = slugify(caption);
        let mut key = base.clone();
        let mut n = 2;
        while !used.insert(key.clone()) {
            key = format!("{base}_{n}");
            n += 1;
        }

        let aliases = normalize_aliases(
            [
                field.name.as_str(),
                field.label.as_str(),
                field.placeholder.as_str(),
                key.as_str(),
            ],
            &key,
        );
        template.fields.push(TemplateField {
            label: if caption.is_empty() {
                key.clone()
            } else {
                caption.to_string()
            },
            key,
            value: field.value.clone().unwrap_or_default(),
            aliases,
        });
    }
    template
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_keys_aliases_and_values() {
        let mut email = FieldDescriptor::new("#e")
            .with_name("user_email")
            .with_label("Email Address")
            .with_placeholder("you@example.com");
        email.value = Some("ada@example.com".into());
        let phone = FieldDescriptor::new("#p").with_name("tel");

        let template = seed_template(" Imported ", &[email, phone]);
        assert_eq!(template.name, "Imported");
        assert!(template.id.is_empty());

        let first = &template.fields[0];
        assert_eq!(first.key, "email_address");
        assert_eq!(first.label, "Email Address");
        assert_eq!(first.value, "ada@example.com");
        assert_eq!(
            first.aliases,
            vec!["user_email", "email address", "you@example.com", "email_address"]
        );

        let second = &template.fields[1];
        assert_eq!(second.key, "tel");
        assert_eq!(second.label, "tel");
        assert_eq!(second.value, "");
        assert_eq!(second.aliases, vec!["tel"]);
    }

    #[test]
    fn duplicate_slugs_are_suffixed() {
        let fields = vec![
            FieldDescriptor::new("#a").with_label("Phone"),
            FieldDescriptor::new("#b").with_label("phone"),
            FieldDescriptor::new("#c").with_label("PHONE!"),
            FieldDescriptor::new("#d"),
            FieldDescriptor::new("#e"),
        ];
        let keys: Vec<_> = seed_template("T", &fields)
            .fields
            .into_iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(keys, vec!["phone", "phone_2", "phone_3", "field", "field_2"]);
    }

    #[test]
    fn every_key_is_an_alias() {
        let fields = vec![
            FieldDescriptor::new("#a").with_label("First, Name"),
            FieldDescriptor::new("#b").with_label("First Name"),
        ];
        for field in seed_template("T", &fields).fields {
            assert!(field.aliases.contains(&field.key));
            assert!(field.aliases.iter().all(|a| !a.contains(',')));
        }
    }
}
