//! Bookstore sample tree
//!
//! A fixed three-book catalogue used by the `sample` command and as a
//! realistic fixture in tests.

use tracing::instrument;

use crate::domain::{DomainResult, ElementSpec, NodeId, Value, XmlArena};

struct Book {
    category: &'static str,
    title: &'static str,
    author: &'static str,
    year: i64,
    price: f64,
}

const BOOKS: [Book; 3] = [
    Book {
        category: "cooking",
        title: "Everyday Italian",
        author: "Giada De Laurentiis",
        year: 2005,
        price: 24.95,
    },
    Book {
        category: "children",
        title: "Harry Potter",
        author: "J K. Rowling",
        year: 2005,
        price: 29.99,
    },
    Book {
        category: "web",
        title: "Learning XML",
        author: "Erik T. Ray",
        year: 2003,
        price: 39.95,
    },
];

/// Expected serialization of [`build_bookstore`].
pub const BOOKSTORE_XML: &str = r#"<bookstore>
  <book category="cooking">
    <title lang="en">Everyday Italian</title>
    <author>Giada De Laurentiis</author>
    <year>2005</year>
    <price>24.95</price>
  </book>
  <book category="children">
    <title lang="en">Harry Potter</title>
    <author>J K. Rowling</author>
    <year>2005</year>
    <price>29.99</price>
  </book>
  <book category="web">
    <title lang="en">Learning XML</title>
    <author>Erik T. Ray</author>
    <year>2003</year>
    <price>39.95</price>
  </book>
</bookstore>
"#;

/// Builds the bookstore tree in `arena` and returns its root.
#[instrument(level = "debug", skip(arena))]
pub fn build_bookstore(arena: &mut XmlArena) -> DomainResult<NodeId> {
    let root = arena.new_node("bookstore", true);
    for book in &BOOKS {
        let id = arena.make_child(root, ElementSpec::new("book").attribute("category", book.category))?;
        arena.make_child(id, ElementSpec::new("title").attribute("lang", "en").value(book.title))?;
        arena.make_child(id, ElementSpec::new("author").value(book.author))?;
        arena.make_child(id, ElementSpec::new("year").value(Value::Integer(book.year)))?;
        arena.make_child(id, ElementSpec::new("price").value(Value::Float(book.price)))?;
    }
    Ok(root)
}
