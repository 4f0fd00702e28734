mod follows;
mod posts;
mod timeline;
mod users;
