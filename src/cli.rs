// Command-line interface
// One subcommand per page of the blog application.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Password};
use std::path::{Path, PathBuf};

use crate::api;
use crate::api::password_reset::PasswordReset;
use crate::client::ApiClient;
use crate::config::ConnectionArgs;
use crate::models::{
    AdminStatus, FileUpload, Post, PostDraft, PostQuery, ProfileUpdate, SecurityQuestion,
    SignupRequest, UserAccount,
};

// The fixed recovery questions every account answers at signup, in the
// order the backend stores them.
const SIGNUP_QUESTIONS: [&str; 3] = [
    "What is your favourite colour?",
    "What is your favourite animal?",
    "What is your favourite food?",
];

#[derive(Parser)]
#[command(
    name = "techblog-client",
    version,
    about = "Command-line client for the techblog API"
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and persist the session
    Login {
        /// Username or email (prompted when omitted)
        username: Option<String>,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Register a new account (interactive)
    Signup,
    /// Exchange a Google One Tap ID token for a session
    GoogleLogin {
        /// The ID token from Google (prompted when omitted)
        credential: Option<String>,
    },
    /// Show the signed-in user
    Whoami,
    /// Recover a forgotten password via security questions
    ForgotPassword,
    /// Browse and manage posts
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Read and write comments
    #[command(subcommand)]
    Comments(CommentsCommand),
    /// Like a post
    Like {
        post_id: i64,
    },
    /// Remove a like
    Unlike {
        like_id: i64,
    },
    /// List all tags
    Tags,
    /// Show or edit your profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// User administration (admin accounts only)
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
pub enum PostsCommand {
    /// List posts
    List {
        /// Filter by author id
        #[arg(long)]
        author: Option<String>,
        /// Full-text search
        #[arg(long)]
        search: Option<String>,
        /// Comma-separated tag filter
        #[arg(long)]
        tags: Option<String>,
        /// Ordering field, e.g. "-created_at"
        #[arg(long)]
        ordering: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Show one post, with its comments
    Show {
        slug: String,
    },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        /// Post body text
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the post body from a file
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Tag the post (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Cover image path
        #[arg(long)]
        cover: Option<PathBuf>,
        /// Keep the post unpublished
        #[arg(long)]
        draft: bool,
    },
    /// Replace a post
    Update {
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        cover: Option<PathBuf>,
        #[arg(long)]
        draft: bool,
    },
    /// Delete a post
    Delete {
        slug: String,
    },
    /// Show the landing-page highlights
    Highlighted,
    /// Generate blog text from a prompt
    Generate {
        /// Approximate word count (50-2000)
        #[arg(long, default_value = "500")]
        wordcount: u32,
        #[arg(long)]
        prompt: String,
    },
}

#[derive(Subcommand)]
pub enum CommentsCommand {
    /// Comments on a post
    List {
        post_id: i64,
    },
    /// Comment on a post
    Add {
        post_id: i64,
        content: String,
    },
    /// Edit one of your comments
    Edit {
        comment_id: i64,
        content: String,
    },
    /// Delete one of your comments
    Delete {
        comment_id: i64,
    },
    /// Your own comments across all posts
    Mine {
        /// At most this many (backend caps at 100)
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show your account and profile
    Show,
    /// Update account or profile fields; unset flags stay unchanged
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        linkedin: Option<String>,
        #[arg(long)]
        github: Option<String>,
        #[arg(long)]
        facebook: Option<String>,
        #[arg(long)]
        x_twitter: Option<String>,
        #[arg(long)]
        website: Option<String>,
        /// Avatar image path
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List all accounts
    Users,
    /// Grant the admin flag
    Grant {
        user_id: i64,
    },
    /// Revoke the admin flag
    Revoke {
        user_id: i64,
    },
    /// Delete an account
    DeleteUser {
        user_id: i64,
    },
}

pub async fn run(command: Command, client: &ApiClient) -> Result<()> {
    match command {
        Command::Login { username } => login(client, username).await,
        Command::Logout => {
            api::auth::logout(client).await?;
            println!("👋 Signed out");
            Ok(())
        }
        Command::Signup => signup(client).await,
        Command::GoogleLogin { credential } => google_login(client, credential).await,
        Command::Whoami => whoami(client).await,
        Command::ForgotPassword => forgot_password(client).await,
        Command::Posts(command) => posts(client, command).await,
        Command::Comments(command) => comments(client, command).await,
        Command::Like { post_id } => {
            let like = api::likes::like(client, post_id).await?;
            println!("♥ Liked \"{}\" (like id {})", like.post_title, like.id);
            Ok(())
        }
        Command::Unlike { like_id } => {
            api::likes::unlike(client, like_id).await?;
            println!("♥ Like removed");
            Ok(())
        }
        Command::Tags => {
            for tag in api::posts::tags(client).await? {
                println!("{}  ({})", tag.name, tag.slug);
            }
            Ok(())
        }
        Command::Profile(command) => profile(client, command).await,
        Command::Admin(command) => admin(client, command).await,
    }
}

async fn login(client: &ApiClient, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::new()
            .with_prompt("Username or email")
            .interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let data = api::auth::login(client, &username, &password).await?;
    println!(
        "✅ Signed in as {} <{}>{}",
        data.username,
        data.email,
        if data.is_admin_user { " (admin)" } else { "" }
    );
    Ok(())
}

async fn signup(client: &ApiClient) -> Result<()> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match.")
        .interact()?;

    let first_name: String = Input::new()
        .with_prompt("First name (optional)")
        .allow_empty(true)
        .interact_text()?;
    let last_name: String = Input::new()
        .with_prompt("Last name (optional)")
        .allow_empty(true)
        .interact_text()?;
    let address: String = Input::new()
        .with_prompt("Address (optional)")
        .allow_empty(true)
        .interact_text()?;
    let phone_number: String = Input::new()
        .with_prompt("Phone number (optional)")
        .allow_empty(true)
        .interact_text()?;

    println!("Security questions (for account recovery):");
    let mut security_answers = Vec::new();
    for question in SIGNUP_QUESTIONS {
        let answer: String = Input::new().with_prompt(question).interact_text()?;
        security_answers.push(answer);
    }

    let request = SignupRequest {
        username,
        email,
        password,
        first_name: none_if_empty(first_name),
        last_name: none_if_empty(last_name),
        address: none_if_empty(address),
        phone_number: none_if_empty(phone_number),
        security_answers,
    };

    let data = api::auth::signup(client, &request).await?;
    println!("✅ {}", data.message);
    println!("Sign in with `techblog-client login`");
    Ok(())
}

async fn google_login(client: &ApiClient, credential: Option<String>) -> Result<()> {
    let credential = match credential {
        Some(credential) => credential,
        None => Input::new()
            .with_prompt("Google ID token")
            .interact_text()?,
    };

    let data = api::auth::google_login(client, &credential).await?;
    println!(
        "✅ Signed in as {} <{}>",
        data.user.username, data.user.email
    );
    Ok(())
}

async fn whoami(client: &ApiClient) -> Result<()> {
    if !api::auth::is_authenticated(client).await {
        println!("Not signed in");
        return Ok(());
    }
    match api::auth::me(client)? {
        Some(user) => println!(
            "{} <{}>{}",
            user.username,
            user.email,
            if user.is_admin_user { " (admin)" } else { "" }
        ),
        None => println!("Signed in (no cached profile)"),
    }
    Ok(())
}

async fn forgot_password(client: &ApiClient) -> Result<()> {
    let email: String = Input::new().with_prompt("Account email").interact_text()?;
    let mut wizard = PasswordReset::start(client, &email).await?;

    let questions: Vec<SecurityQuestion> = wizard.questions().to_vec();
    println!("Answer your security questions:");
    let mut answers = Vec::new();
    for question in &questions {
        let answer: String = Input::new()
            .with_prompt(&question.question_text)
            .interact_text()?;
        answers.push(answer);
    }

    let verified = wizard.verify(&answers).await?;
    println!("✅ {verified}");

    let new_password = Password::new().with_prompt("New password").interact()?;
    let confirm = Password::new()
        .with_prompt("Confirm new password")
        .interact()?;

    let data = wizard.reset(&new_password, &confirm).await?;
    println!("✅ {}", data.message);
    Ok(())
}

async fn posts(client: &ApiClient, command: PostsCommand) -> Result<()> {
    match command {
        PostsCommand::List {
            author,
            search,
            tags,
            ordering,
            page,
            limit,
            offset,
        } => {
            let query = PostQuery {
                author,
                search,
                tags,
                ordering,
                page,
                limit,
                offset,
            };
            let listing = api::posts::list(client, &query).await?;
            println!("{} posts", listing.total());
            for post in listing.items() {
                print_post_line(post);
            }
            if listing.has_more() {
                println!("(more pages available, repeat with --page)");
            }
            Ok(())
        }
        PostsCommand::Show { slug } => {
            let post = api::posts::get(client, &slug).await?;
            print_post(&post);
            Ok(())
        }
        PostsCommand::Create {
            title,
            content,
            content_file,
            tags,
            cover,
            draft,
        } => {
            let draft = build_draft(title, content, content_file, tags, cover, draft)?;
            let post = api::posts::create(client, &draft).await?;
            println!("✅ Created \"{}\" ({})", post.title, post.slug);
            Ok(())
        }
        PostsCommand::Update {
            slug,
            title,
            content,
            content_file,
            tags,
            cover,
            draft,
        } => {
            let draft = build_draft(title, content, content_file, tags, cover, draft)?;
            let post = api::posts::update(client, &slug, &draft).await?;
            println!("✅ Updated \"{}\" ({})", post.title, post.slug);
            Ok(())
        }
        PostsCommand::Delete { slug } => {
            api::posts::delete(client, &slug).await?;
            println!("✅ Deleted {slug}");
            Ok(())
        }
        PostsCommand::Highlighted => {
            let highlighted = api::posts::highlighted(client).await?;
            println!("Latest:");
            for post in &highlighted.latest {
                print_post_line(post);
            }
            println!("Most liked:");
            for post in &highlighted.most_liked {
                print_post_line(post);
            }
            Ok(())
        }
        PostsCommand::Generate { wordcount, prompt } => {
            let data = api::posts::generate_blog(client, wordcount, &prompt).await?;
            println!("{}", data.blog_text);
            Ok(())
        }
    }
}

async fn comments(client: &ApiClient, command: CommentsCommand) -> Result<()> {
    match command {
        CommentsCommand::List { post_id } => {
            for comment in api::comments::list(client, post_id).await? {
                println!(
                    "#{} {} ({}){}: {}",
                    comment.id,
                    comment.author_username,
                    comment.created_at.format("%Y-%m-%d %H:%M"),
                    edited_marker(&comment.created_at, &comment.updated_at),
                    comment.content
                );
            }
            Ok(())
        }
        CommentsCommand::Add { post_id, content } => {
            let comment = api::comments::create(client, post_id, &content).await?;
            println!("✅ Comment #{} added", comment.id);
            Ok(())
        }
        CommentsCommand::Edit {
            comment_id,
            content,
        } => {
            api::comments::edit(client, comment_id, &content).await?;
            println!("✅ Comment #{comment_id} updated");
            Ok(())
        }
        CommentsCommand::Delete { comment_id } => {
            api::comments::delete(client, comment_id).await?;
            println!("✅ Comment #{comment_id} deleted");
            Ok(())
        }
        CommentsCommand::Mine { limit } => {
            for comment in api::comments::mine(client, limit).await? {
                println!(
                    "#{}  {}  on \"{}\" ({}): {}",
                    comment.id,
                    comment.created_at,
                    comment.post_title,
                    comment.post_slug,
                    comment.content
                );
            }
            Ok(())
        }
    }
}

async fn profile(client: &ApiClient, command: ProfileCommand) -> Result<()> {
    match command {
        ProfileCommand::Show => {
            let account = api::profile::fetch(client).await?;
            print_account(&account);
            Ok(())
        }
        ProfileCommand::Update {
            first_name,
            last_name,
            address,
            phone_number,
            bio,
            linkedin,
            github,
            facebook,
            x_twitter,
            website,
            avatar,
        } => {
            let avatar = avatar.map(|path| read_upload(&path)).transpose()?;
            let update = ProfileUpdate {
                first_name,
                last_name,
                address,
                phone_number,
                bio,
                linkedin,
                github,
                facebook,
                x_twitter,
                website,
                avatar,
            };
            let account = api::profile::update(client, &update).await?;
            println!("✅ Profile updated");
            print_account(&account);
            Ok(())
        }
    }
}

async fn admin(client: &ApiClient, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Users => {
            for account in api::admin::list_users(client).await? {
                println!(
                    "#{:<5} {:<20} {:<30}{}",
                    account.id,
                    account.username,
                    account.email,
                    if account.is_admin_user { " admin" } else { "" }
                );
            }
            Ok(())
        }
        AdminCommand::Grant { user_id } => {
            let status = api::admin::set_admin(client, user_id, true).await?;
            print_admin_status(&status);
            Ok(())
        }
        AdminCommand::Revoke { user_id } => {
            let status = api::admin::set_admin(client, user_id, false).await?;
            print_admin_status(&status);
            Ok(())
        }
        AdminCommand::DeleteUser { user_id } => {
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete user #{user_id}? This cannot be undone"))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Aborted");
                return Ok(());
            }
            let data = api::admin::delete_user(client, user_id).await?;
            println!("✅ {}", data.message);
            Ok(())
        }
    }
}

fn build_draft(
    title: String,
    content: Option<String>,
    content_file: Option<PathBuf>,
    tags: Vec<String>,
    cover: Option<PathBuf>,
    draft: bool,
) -> Result<PostDraft> {
    let content = match (content, content_file) {
        (Some(content), _) => content,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Provide the post body with --content or --content-file"),
    };
    let cover = cover.map(|path| read_upload(&path)).transpose()?;

    Ok(PostDraft {
        title,
        content,
        tags,
        is_published: !draft,
        cover,
    })
}

fn read_upload(path: &Path) -> Result<FileUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(FileUpload::new(file_name, bytes))
}

fn none_if_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn print_post_line(post: &Post) {
    println!(
        "#{:<5} {}  {:<30} by {:<15} ♥{:<4} {}",
        post.id,
        post.created_at.format("%Y-%m-%d"),
        post.slug,
        post.author_username,
        post.likes_count,
        post.title
    );
}

fn print_post(post: &Post) {
    println!("# {}  ({})", post.title, post.slug);
    println!(
        "post #{} by {} on {}{}{}",
        post.id,
        post.author_username,
        post.created_at.format("%Y-%m-%d"),
        if post.updated_at.timestamp() > post.created_at.timestamp() {
            format!(", updated {}", post.updated_at.format("%Y-%m-%d"))
        } else {
            String::new()
        },
        if post.is_published {
            ""
        } else {
            "  [unpublished]"
        }
    );
    if !post.tags.is_empty() {
        println!("tags: {}", post.tags.join(", "));
    }
    if let Some(cover) = &post.cover {
        println!("cover: {cover}");
    }
    println!();
    println!("{}", post.content);
    println!();
    let liked = match (post.liked_by_user, post.like_id) {
        (true, Some(like_id)) => format!("  liked by you (like id {like_id})"),
        (true, None) => "  liked by you".to_string(),
        _ => String::new(),
    };
    println!(
        "♥ {}{}   {} comments",
        post.likes_count,
        liked,
        post.comments.len()
    );
    for comment in &post.comments {
        println!(
            "  #{} {} ({}){}: {}",
            comment.id,
            comment.author_username,
            comment.created_at.format("%Y-%m-%d"),
            edited_marker(&comment.created_at, &comment.updated_at),
            comment.content
        );
    }
}

/// `" (edited)"` when the update timestamp is strictly later than the
/// creation timestamp. Creation writes both in the same save.
fn edited_marker(created_at: &DateTime<Utc>, updated_at: &DateTime<Utc>) -> &'static str {
    if updated_at.timestamp() > created_at.timestamp() {
        " (edited)"
    } else {
        ""
    }
}

fn print_admin_status(status: &AdminStatus) {
    println!(
        "✅ #{} {}  admin: {}",
        status.id,
        status.username,
        if status.is_admin_user { "yes" } else { "no" }
    );
}

fn print_account(account: &UserAccount) {
    println!(
        "#{} {} <{}>{}",
        account.id,
        account.username,
        account.email,
        if account.is_admin_user { " (admin)" } else { "" }
    );
    let name = [
        account.first_name.as_deref().unwrap_or(""),
        account.last_name.as_deref().unwrap_or(""),
    ]
    .join(" ");
    if !name.trim().is_empty() {
        println!("name:     {}", name.trim());
    }
    if let Some(address) = account.address.as_deref().filter(|s| !s.is_empty()) {
        println!("address:  {address}");
    }
    if let Some(phone) = account.phone_number.as_deref().filter(|s| !s.is_empty()) {
        println!("phone:    {phone}");
    }
    let profile = &account.profile;
    if let Some(bio) = profile.bio.as_deref().filter(|s| !s.is_empty()) {
        println!("bio:      {bio}");
    }
    let links = [
        ("linkedin", &profile.linkedin),
        ("github", &profile.github),
        ("facebook", &profile.facebook),
        ("x", &profile.x_twitter),
        ("website", &profile.website),
    ];
    for (label, value) in links {
        if let Some(value) = value.as_deref().filter(|s| !s.is_empty()) {
            println!("{label}: {value}");
        }
    }
    if let Some(avatar) = profile.avatar.as_deref() {
        println!("avatar:   {avatar}");
    }
}
