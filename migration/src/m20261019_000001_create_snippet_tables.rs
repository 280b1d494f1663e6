use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Snippets table
        manager
            .create_table(
                Table::create()
                    .table(Snippet::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Snippet::Id)
                            .integer()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Snippet::Title)
                            .string_len(100)
                            .not_null()
                            .check(Expr::cust(
                                "length(CAST(title AS BLOB)) > 0 AND length(title) <= 100",
                            )),
                    )
                    .col(
                        ColumnDef::new(Snippet::Content)
                            .text()
                            .not_null()
                            .check(Expr::cust(
                                "length(CAST(content AS BLOB)) > 0 AND length(content) <= 50000",
                            )),
                    )
                    .col(ColumnDef::new(Snippet::Language).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Snippet::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Snippet::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Tags table
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tag::Id)
                            .integer()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tag::Name)
                            .string_len(30)
                            .not_null()
                            .unique_key()
                            .check(Expr::cust(
                                "length(CAST(name AS BLOB)) > 0 AND length(name) <= 30",
                            )),
                    )
                    .col(
                        ColumnDef::new(Tag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Snippet Tags join table
        manager
            .create_table(
                Table::create()
                    .table(SnippetTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SnippetTag::SnippetId).integer().not_null())
                    .col(ColumnDef::new(SnippetTag::TagId).integer().not_null())
                    .col(
                        ColumnDef::new(SnippetTag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_snippet_tag")
                            .col(SnippetTag::SnippetId)
                            .col(SnippetTag::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_snippet_tag_snippet_id")
                            .from(SnippetTag::Table, SnippetTag::SnippetId)
                            .to(Snippet::Table, Snippet::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_snippet_tag_tag_id")
                            .from(SnippetTag::Table, SnippetTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_snippet_created_at")
                    .table(Snippet::Table)
                    .col(Snippet::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_snippet_updated_at")
                    .table(Snippet::Table)
                    .col(Snippet::UpdatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_snippet_language")
                    .table(Snippet::Table)
                    .col(Snippet::Language)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_snippet_tag_tag_id")
                    .table(SnippetTag::Table)
                    .col(SnippetTag::TagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of creation
        manager
            .drop_table(Table::drop().table(SnippetTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Snippet::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Snippet {
    #[sea_orm(iden = "snippets")]
    Table,
    Id,
    Title,
    Content,
    Language,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tag {
    #[sea_orm(iden = "tags")]
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SnippetTag {
    #[sea_orm(iden = "snippet_tags")]
    Table,
    SnippetId,
    TagId,
    CreatedAt,
}
