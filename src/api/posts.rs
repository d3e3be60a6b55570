// Post operations

use crate::client::{ApiClient, OwnedForm};
use crate::error::Result;
use crate::models::{
    BlogExpansionRequest, BlogExpansionResponse, HighlightedPosts, Listing, Post, PostDraft,
    PostQuery, Tag,
};

/// List published posts, filtered and paginated per `query`.
pub async fn list(client: &ApiClient, query: &PostQuery) -> Result<Listing<Post>> {
    client.get_json_query("/posts/", query.to_pairs()).await
}

/// Fetch a single post by slug.
pub async fn get(client: &ApiClient, slug: &str) -> Result<Post> {
    client.get_json(&format!("/posts/{slug}/")).await
}

pub async fn create(client: &ApiClient, draft: &PostDraft) -> Result<Post> {
    client.post_multipart("/posts/", draft_form(draft)).await
}

/// Replace a post. Only the author (or an admin) may do this.
pub async fn update(client: &ApiClient, slug: &str, draft: &PostDraft) -> Result<Post> {
    client
        .put_multipart(&format!("/posts/{slug}/"), draft_form(draft))
        .await
}

pub async fn delete(client: &ApiClient, slug: &str) -> Result<()> {
    client.delete(&format!("/posts/{slug}/")).await
}

/// The landing-page rails: six newest and six most-liked posts.
pub async fn highlighted(client: &ApiClient) -> Result<HighlightedPosts> {
    client.get_json("/highlighted-posts/").await
}

/// Every tag in use.
pub async fn tags(client: &ApiClient) -> Result<Vec<Tag>> {
    let listing: Listing<Tag> = client.get_json("/tags/").await?;
    Ok(listing.into_items())
}

/// Ask the backend to draft blog text of roughly `wordcount` words.
pub async fn generate_blog(
    client: &ApiClient,
    wordcount: u32,
    prompt_suggestion: &str,
) -> Result<BlogExpansionResponse> {
    let body = BlogExpansionRequest {
        wordcount,
        prompt_suggestion,
    };
    client.post_json("/generate-blog/", &body).await
}

/// A draft serializes as multipart: one `tags` part per tag, the cover
/// as a file part.
fn draft_form(draft: &PostDraft) -> OwnedForm {
    let mut form = OwnedForm::new()
        .text("title", draft.title.clone())
        .text("content", draft.content.clone())
        .text(
            "is_published",
            if draft.is_published { "true" } else { "false" },
        );
    for tag in &draft.tags {
        form = form.text("tags", tag.clone());
    }
    if let Some(cover) = &draft.cover {
        form = form.file("cover", cover.file_name.clone(), cover.bytes.clone());
    }
    form
}
