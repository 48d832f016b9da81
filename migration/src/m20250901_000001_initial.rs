use sea_orm_migration::prelude::*;

/// 管理员账号
#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    Role,
    IsActive,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

/// 中奖者记录
#[derive(DeriveIden)]
enum Winners {
    Table,
    Id,
    ExternalId,
    Phone,
    Name,
    Address,
    Paid,
    Product,
    PrizeAmount,
    Date,
    Status,
    Wcode,
    Image,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admins::Username).string_len(64).not_null())
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::Email).string_len(255).null())
                    .col(
                        ColumnDef::new(Admins::Role)
                            .string_len(32)
                            .not_null()
                            .default("admin"),
                    )
                    .col(
                        ColumnDef::new(Admins::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Admins::LastLoginAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Admins::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Admins::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_admins_username_unique")
                    .table(Admins::Table)
                    .col(Admins::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 金额 / 日期 / 已付 均按文本存储，与导入表格保持一致
        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Winners::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Winners::ExternalId).string_len(128).not_null())
                    .col(ColumnDef::new(Winners::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Winners::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Winners::Address).text().not_null())
                    .col(ColumnDef::new(Winners::Paid).string_len(64).not_null())
                    .col(ColumnDef::new(Winners::Product).string_len(255).not_null())
                    .col(ColumnDef::new(Winners::PrizeAmount).string_len(64).not_null())
                    .col(ColumnDef::new(Winners::Date).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Winners::Status)
                            .string_len(32)
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(Winners::Wcode).string_len(128).not_null())
                    .col(ColumnDef::new(Winners::Image).string_len(255).null())
                    .col(
                        ColumnDef::new(Winners::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Winners::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Winners::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // external_id / wcode 唯一：导入时 "先查后写" 的竞争由数据库兜底
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_winners_external_id")
                    .table(Winners::Table)
                    .col(Winners::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_winners_wcode")
                    .table(Winners::Table)
                    .col(Winners::Wcode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_winners_phone", Winners::Phone),
            ("idx_winners_name", Winners::Name),
            ("idx_winners_status", Winners::Status),
            ("idx_winners_created_at", Winners::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Winners::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Winners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Admins::Table).to_owned())
            .await?;
        Ok(())
    }
}
