use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create destinations table
        manager
            .create_table(
                Table::create()
                    .table(Destinations::Table)
                    .if_not_exists()
                    .col(pk_auto(Destinations::Id))
                    .col(string(Destinations::Photo1))
                    .col(string(Destinations::Photo2))
                    .col(string(Destinations::Name))
                    .col(double(Destinations::Price))
                    .col(string(Destinations::MetaDescription))
                    .col(string(Destinations::Description))
                    .col(big_integer(Destinations::CreatedAt))
                    .col(big_integer(Destinations::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create reviews table
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(pk_auto(Reviews::Id))
                    .col(string(Reviews::Photo))
                    .col(string(Reviews::Review))
                    .col(string(Reviews::UserName))
                    .col(big_integer(Reviews::CreatedAt))
                    .col(big_integer(Reviews::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Destinations::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Destinations {
    Table,
    Id,
    #[sea_orm(iden = "photo_1")]
    Photo1,
    #[sea_orm(iden = "photo_2")]
    Photo2,
    Name,
    Price,
    MetaDescription,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    Photo,
    Review,
    UserName,
    CreatedAt,
    UpdatedAt,
}
