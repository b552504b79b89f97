use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::{format_date, parse_date};
use crate::models::Article;

/// Newest articles first.
pub fn fetch_articles(conn: &Connection) -> Result<Vec<Article>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, author, published_on, excerpt, content
             FROM articles
             ORDER BY published_on DESC, id",
        )
        .context("failed to prepare article query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .context("failed to iterate articles")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect articles")?;

    let mut articles = Vec::with_capacity(rows.len());
    for (id, title, author, raw_date, excerpt, content) in rows {
        articles.push(Article {
            id,
            title,
            author,
            date: parse_date(&raw_date)?,
            excerpt,
            content,
            tags: fetch_tags(conn, id)?,
        });
    }
    Ok(articles)
}

fn fetch_tags(conn: &Connection, article_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT tag FROM article_tags WHERE article_id = ?1 ORDER BY position")
        .context("failed to prepare article tag query")?;
    let tags = stmt
        .query_map([article_id], |row| row.get(0))
        .context("failed to iterate article tags")?
        .collect::<Result<Vec<String>, _>>()
        .context("failed to collect article tags")?;
    Ok(tags)
}

/// Insert an article and its tags, returning the new row id.
pub fn insert_article(conn: &mut Connection, article: &Article) -> Result<i64> {
    let tx = conn.transaction().context("failed to start article insert")?;
    tx.execute(
        "INSERT INTO articles (title, author, published_on, excerpt, content)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            article.title,
            article.author,
            format_date(article.date),
            article.excerpt,
            article.content
        ],
    )
    .context("failed to insert article")?;
    let id = tx.last_insert_rowid();

    for (position, tag) in article.tags.iter().enumerate() {
        tx.execute(
            "INSERT INTO article_tags (article_id, position, tag) VALUES (?1, ?2, ?3)",
            params![id, position as i64, tag],
        )
        .context("failed to insert article tag")?;
    }

    tx.commit().context("failed to commit article insert")?;
    Ok(id)
}
