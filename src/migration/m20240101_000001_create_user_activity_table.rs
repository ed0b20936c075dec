use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserActivity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserActivity::Id)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserActivity::SessionId).string().not_null())
                    .col(ColumnDef::new(UserActivity::UserId).string().not_null())
                    .col(ColumnDef::new(UserActivity::VscodeState).text().not_null())
                    .col(ColumnDef::new(UserActivity::Mode).string().not_null())
                    .col(
                        ColumnDef::new(UserActivity::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserActivity::Synced)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserActivity::ExtensionName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserActivity::ExtensionVersion)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserActivity::WorkspaceId).string().not_null())
                    .col(ColumnDef::new(UserActivity::TaskId).string().null())
                    .col(ColumnDef::new(UserActivity::VsCodeUsage).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Backs the unsynced read path
        manager
            .create_index(
                Index::create()
                    .name("idx_user_activity_synced")
                    .table(UserActivity::Table)
                    .col(UserActivity::Synced)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserActivity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserActivity {
    Table,
    Id,
    SessionId,
    UserId,
    VscodeState,
    Mode,
    Timestamp,
    Synced,
    ExtensionName,
    ExtensionVersion,
    WorkspaceId,
    TaskId,
    VsCodeUsage,
}
