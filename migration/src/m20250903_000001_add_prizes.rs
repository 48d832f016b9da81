use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

/// 首页 / 奖品页展示的奖品
#[derive(DeriveIden)]
enum Prizes {
    Table,
    Id,
    Title,
    Description,
    Amount,
    Image,
    Position,
    Emoji,
    Medal,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 金额单位为卢比（整数）
/// position 唯一，用于排序展示
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prizes::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Prizes::Description).text().not_null())
                    .col(ColumnDef::new(Prizes::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Prizes::Image).string_len(255).not_null())
                    .col(ColumnDef::new(Prizes::Position).integer().not_null())
                    .col(
                        ColumnDef::new(Prizes::Emoji)
                            .string_len(16)
                            .not_null()
                            .default("🏆"),
                    )
                    .col(
                        ColumnDef::new(Prizes::Medal)
                            .string_len(16)
                            .not_null()
                            .default("🏆"),
                    )
                    .col(
                        ColumnDef::new(Prizes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Prizes::UpdatedAt)
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
                    .name("uq_prizes_position")
                    .table(Prizes::Table)
                    .col(Prizes::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 初始化默认奖品（已存在的 position 跳过）
        let conn = manager.get_connection();
        let insert_sql = r#"
INSERT INTO prizes (title, description, amount, image, position, emoji, medal, is_active)
VALUES
 ('Maruti XL6', 'Maruti XL6 Rs 14,80,000', 1480000, 'win1.jpg', 1, '🏆', '🥇', TRUE),
 ('Tata Nexon', 'Tata Nexon Rs 9,80,000', 980000, 'win2.jpg', 2, '🏆', '🥈', TRUE),
 ('Maruti Swift Dzire', 'Maruti Swift Dzire Rs 9,30,000', 930000, 'win3.jpg', 3, '🏆', '🥉', TRUE),
 ('Honda City', 'Honda City Rs 12,50,000', 1250000, 'win4.jpg', 4, '🏆', '🏆', TRUE)
ON CONFLICT (position) DO NOTHING;
"#;
        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            insert_sql.to_string(),
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Prizes::Table).to_owned())
            .await?;
        Ok(())
    }
}
