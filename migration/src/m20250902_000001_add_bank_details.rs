use sea_orm_migration::prelude::*;

/// 中奖者收款银行信息
#[derive(DeriveIden)]
enum BankDetails {
    Table,
    Id,
    WinnerId,
    WinnerName,
    Phone,
    Wcode,
    BankName,
    AccountNumber,
    IfscCode,
    AccountHolderName,
    BranchName,
    PrizeAmount,
    PrizeType,
    Status,
    VerificationStatus,
    Notes,
    AdminNotes,
    PaymentDate,
    TransactionId,
    PaymentMethod,
    CreatedBy,
    UpdatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

/// 公司收款账户（对外展示）
#[derive(DeriveIden)]
enum CompanyBankDetails {
    Table,
    Id,
    CompanyName,
    BankName,
    AccountNumber,
    IfscCode,
    AccountHolderName,
    BranchName,
    BranchAddress,
    AccountType,
    Purpose,
    DisplayName,
    IsActive,
    IsPrimary,
    Description,
    Instructions,
    ContactPhone,
    ContactEmail,
    UpiId,
    QrCodePath,
    CreatedBy,
    UpdatedBy,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Winners {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BankDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankDetails::WinnerId).big_integer().not_null())
                    .col(ColumnDef::new(BankDetails::WinnerName).string_len(255).not_null())
                    .col(ColumnDef::new(BankDetails::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(BankDetails::Wcode).string_len(128).not_null())
                    .col(ColumnDef::new(BankDetails::BankName).string_len(255).not_null())
                    .col(ColumnDef::new(BankDetails::AccountNumber).string_len(64).not_null())
                    .col(ColumnDef::new(BankDetails::IfscCode).string_len(32).not_null())
                    .col(
                        ColumnDef::new(BankDetails::AccountHolderName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BankDetails::BranchName).string_len(255).null())
                    .col(
                        ColumnDef::new(BankDetails::PrizeAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BankDetails::PrizeType)
                            .string_len(16)
                            .not_null()
                            .default("Cash"),
                    )
                    .col(
                        ColumnDef::new(BankDetails::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(BankDetails::VerificationStatus)
                            .string_len(32)
                            .not_null()
                            .default("Not Verified"),
                    )
                    .col(ColumnDef::new(BankDetails::Notes).text().null())
                    .col(ColumnDef::new(BankDetails::AdminNotes).text().null())
                    .col(
                        ColumnDef::new(BankDetails::PaymentDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(BankDetails::TransactionId).string_len(128).null())
                    .col(
                        ColumnDef::new(BankDetails::PaymentMethod)
                            .string_len(32)
                            .not_null()
                            .default("Bank Transfer"),
                    )
                    .col(
                        ColumnDef::new(BankDetails::CreatedBy)
                            .string_len(64)
                            .not_null()
                            .default("System"),
                    )
                    .col(ColumnDef::new(BankDetails::UpdatedBy).string_len(64).null())
                    .col(
                        ColumnDef::new(BankDetails::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(BankDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BankDetails::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_details_winner")
                            .from(BankDetails::Table, BankDetails::WinnerId)
                            .to(Winners::Table, Winners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_bank_details_phone", BankDetails::Phone),
            ("idx_bank_details_winner", BankDetails::WinnerId),
            ("idx_bank_details_status", BankDetails::Status),
            ("idx_bank_details_created_at", BankDetails::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(BankDetails::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(CompanyBankDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyBankDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::CompanyName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::BankName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::AccountNumber)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::IfscCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::AccountHolderName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompanyBankDetails::BranchName).string_len(255).null())
                    .col(ColumnDef::new(CompanyBankDetails::BranchAddress).text().null())
                    .col(
                        ColumnDef::new(CompanyBankDetails::AccountType)
                            .string_len(16)
                            .not_null()
                            .default("Current"),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::Purpose)
                            .string_len(32)
                            .not_null()
                            .default("Prize Distribution"),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::DisplayName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CompanyBankDetails::Description).text().null())
                    .col(ColumnDef::new(CompanyBankDetails::Instructions).text().null())
                    .col(ColumnDef::new(CompanyBankDetails::ContactPhone).string_len(32).null())
                    .col(
                        ColumnDef::new(CompanyBankDetails::ContactEmail)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(CompanyBankDetails::UpiId).string_len(128).null())
                    .col(ColumnDef::new(CompanyBankDetails::QrCodePath).string_len(255).null())
                    .col(
                        ColumnDef::new(CompanyBankDetails::CreatedBy)
                            .string_len(64)
                            .not_null()
                            .default("Admin"),
                    )
                    .col(ColumnDef::new(CompanyBankDetails::UpdatedBy).string_len(64).null())
                    .col(
                        ColumnDef::new(CompanyBankDetails::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CompanyBankDetails::UpdatedAt)
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
                    .name("idx_company_bank_active_primary_sort")
                    .table(CompanyBankDetails::Table)
                    .col(CompanyBankDetails::IsActive)
                    .col(CompanyBankDetails::IsPrimary)
                    .col(CompanyBankDetails::SortOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_company_bank_purpose_active")
                    .table(CompanyBankDetails::Table)
                    .col(CompanyBankDetails::Purpose)
                    .col(CompanyBankDetails::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(CompanyBankDetails::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(BankDetails::Table).to_owned())
            .await?;
        Ok(())
    }
}
