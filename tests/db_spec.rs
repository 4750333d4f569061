use speculate2::speculate;
use wiki_api::db::Database;
use wiki_api::models::*;

fn input(title: &str, content: &str) -> ArticleInput {
    ArticleInput {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
    }
}

fn titles(db: &Database) -> Vec<Option<String>> {
    db.find_all_articles()
        .expect("Query failed")
        .into_iter()
        .map(|a| a.title)
        .collect()
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "insert_article" {
        it "assigns an identifier and keeps the fields" {
            let article = db.insert_article(input("DOM", "hello")).expect("Failed to insert");

            assert!(!article.id.is_nil());
            assert_eq!(article.title.as_deref(), Some("DOM"));
            assert_eq!(article.content.as_deref(), Some("hello"));
        }

        it "stores missing fields as absent" {
            let article = db.insert_article(ArticleInput {
                title: Some("Bare".to_string()),
                content: None,
            }).expect("Failed to insert");

            let found = db.find_article("Bare").expect("Query failed").expect("Missing");
            assert_eq!(found.id, article.id);
            assert!(found.content.is_none());
        }

        it "allows duplicate titles" {
            db.insert_article(input("Twin", "first")).expect("Failed to insert");
            db.insert_article(input("Twin", "second")).expect("Failed to insert");

            assert_eq!(db.find_all_articles().expect("Query failed").len(), 2);
        }
    }

    describe "find_all_articles" {
        it "returns empty list when no articles exist" {
            assert!(db.find_all_articles().expect("Query failed").is_empty());
        }

        it "returns articles in insertion order" {
            db.insert_article(input("Zebra", "z")).expect("Failed to insert");
            db.insert_article(input("Alpha", "a")).expect("Failed to insert");

            assert_eq!(titles(&db), vec![Some("Zebra".to_string()), Some("Alpha".to_string())]);
        }
    }

    describe "find_article" {
        it "returns None for an unknown title" {
            assert!(db.find_article("Nope").expect("Query failed").is_none());
        }

        it "matches the title exactly" {
            db.insert_article(input("Jack Liu", "spaces")).expect("Failed to insert");

            assert!(db.find_article("Jack Liu").expect("Query failed").is_some());
            assert!(db.find_article("jack liu").expect("Query failed").is_none());
            assert!(db.find_article("Jack Liu ").expect("Query failed").is_none());
            assert!(db.find_article("Jack%").expect("Query failed").is_none());
        }

        it "returns the first inserted of duplicate titles" {
            db.insert_article(input("Twin", "first")).expect("Failed to insert");
            db.insert_article(input("Twin", "second")).expect("Failed to insert");

            let found = db.find_article("Twin").expect("Query failed").expect("Missing");
            assert_eq!(found.content.as_deref(), Some("first"));
        }
    }

    describe "replace_article" {
        it "overwrites title and content" {
            db.insert_article(input("Old", "old body")).expect("Failed to insert");

            let changed = db.replace_article("Old", input("New", "new body")).expect("Failed to replace");
            assert_eq!(changed, 1);

            assert!(db.find_article("Old").expect("Query failed").is_none());
            let found = db.find_article("New").expect("Query failed").expect("Missing");
            assert_eq!(found.content.as_deref(), Some("new body"));
        }

        it "clears a field the input omits" {
            db.insert_article(input("Keep", "body")).expect("Failed to insert");

            db.replace_article("Keep", ArticleInput {
                title: Some("Keep".to_string()),
                content: None,
            }).expect("Failed to replace");

            let found = db.find_article("Keep").expect("Query failed").expect("Missing");
            assert!(found.content.is_none());
        }

        it "reports zero changes for an unknown title" {
            let changed = db.replace_article("Ghost", input("X", "Y")).expect("Failed to replace");
            assert_eq!(changed, 0);
            assert!(db.find_all_articles().expect("Query failed").is_empty());
        }

        it "only touches the first of duplicate titles" {
            db.insert_article(input("Twin", "first")).expect("Failed to insert");
            db.insert_article(input("Twin", "second")).expect("Failed to insert");

            db.replace_article("Twin", input("Single", "replaced")).expect("Failed to replace");

            assert_eq!(titles(&db), vec![Some("Single".to_string()), Some("Twin".to_string())]);
        }
    }

    describe "merge_article" {
        it "changes only the fields in the patch" {
            db.insert_article(input("REST", "old")).expect("Failed to insert");

            let changed = db.merge_article("REST", &ArticlePatch {
                title: None,
                content: Some("new".to_string()),
            }).expect("Failed to merge");
            assert_eq!(changed, 1);

            let found = db.find_article("REST").expect("Query failed").expect("Missing");
            assert_eq!(found.title.as_deref(), Some("REST"));
            assert_eq!(found.content.as_deref(), Some("new"));
        }

        it "can rename an article" {
            db.insert_article(input("Draft", "body")).expect("Failed to insert");

            db.merge_article("Draft", &ArticlePatch {
                title: Some("Final".to_string()),
                content: None,
            }).expect("Failed to merge");

            let found = db.find_article("Final").expect("Query failed").expect("Missing");
            assert_eq!(found.content.as_deref(), Some("body"));
        }

        it "does nothing for an empty patch" {
            db.insert_article(input("Same", "body")).expect("Failed to insert");

            let changed = db.merge_article("Same", &ArticlePatch::default()).expect("Failed to merge");
            assert_eq!(changed, 0);

            let found = db.find_article("Same").expect("Query failed").expect("Missing");
            assert_eq!(found.content.as_deref(), Some("body"));
        }

        it "reports zero changes for an unknown title" {
            let changed = db.merge_article("Ghost", &ArticlePatch {
                title: None,
                content: Some("x".to_string()),
            }).expect("Failed to merge");
            assert_eq!(changed, 0);
        }
    }

    describe "delete_article" {
        it "removes the matching article" {
            db.insert_article(input("Gone", "bye")).expect("Failed to insert");
            db.insert_article(input("Stay", "hi")).expect("Failed to insert");

            assert_eq!(db.delete_article("Gone").expect("Failed to delete"), 1);
            assert_eq!(titles(&db), vec![Some("Stay".to_string())]);
        }

        it "removes only the first of duplicate titles" {
            db.insert_article(input("Twin", "first")).expect("Failed to insert");
            db.insert_article(input("Twin", "second")).expect("Failed to insert");

            db.delete_article("Twin").expect("Failed to delete");

            let found = db.find_article("Twin").expect("Query failed").expect("Missing");
            assert_eq!(found.content.as_deref(), Some("second"));
        }

        it "reports zero deletions for an unknown title" {
            assert_eq!(db.delete_article("Ghost").expect("Failed to delete"), 0);
        }
    }

    describe "delete_all_articles" {
        it "empties the collection" {
            db.insert_article(input("A", "1")).expect("Failed to insert");
            db.insert_article(input("B", "2")).expect("Failed to insert");

            assert_eq!(db.delete_all_articles().expect("Failed to delete"), 2);
            assert!(db.find_all_articles().expect("Query failed").is_empty());
        }
    }

    describe "lifecycle" {
        it "persists articles across reopen of a file database" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("wiki.db");

            let file_db = Database::open(&path).expect("Failed to open");
            file_db.migrate().expect("Failed to migrate");
            file_db.insert_article(input("Durable", "on disk")).expect("Failed to insert");
            file_db.close().expect("Failed to close");

            let reopened = Database::open(&path).expect("Failed to reopen");
            reopened.migrate().expect("Failed to migrate");
            let found = reopened.find_article("Durable").expect("Query failed").expect("Missing");
            assert_eq!(found.content.as_deref(), Some("on disk"));
        }

        it "fails operations on an unmigrated database" {
            let bare = Database::open_memory().expect("Failed to open");
            assert!(bare.find_all_articles().is_err());
        }

        it "defers close while another handle is alive" {
            let other = db.clone();
            db.close().expect("Close should not fail");

            assert!(other.find_all_articles().expect("Query failed").is_empty());
        }
    }
}
