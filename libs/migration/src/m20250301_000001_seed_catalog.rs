use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            INSERT INTO categories (name)
            VALUES ('Books'), ('Electronics'), ('Computers')
            "#,
        )
        .await?;

        // Ids are left to the sequences, so the first product created through
        // the API gets id 26.
        db.execute_unprepared(
            r#"
            INSERT INTO products (name, description, price, img_url, date)
            VALUES
                ('The Lord of the Rings', 'A fantasy trilogy in one volume.', 90.5, 'https://img.example.com/products/1.jpg', '2020-07-01T10:00:00Z'),
                ('Smart TV', '55 inch 4K television with built-in streaming apps.', 2190.0, 'https://img.example.com/products/2.jpg', '2020-07-02T10:00:00Z'),
                ('Macbook Pro', 'Laptop with a 14 inch display and 16GB of memory.', 1250.0, 'https://img.example.com/products/3.jpg', '2020-07-03T10:00:00Z'),
                ('PC Gamer', 'Desktop with a mid-range graphics card.', 1200.0, 'https://img.example.com/products/4.jpg', '2020-07-04T10:00:00Z'),
                ('Rails for Dummies', 'An introduction to web development with Rails.', 100.99, 'https://img.example.com/products/5.jpg', '2020-07-05T10:00:00Z'),
                ('PC Gamer Ex', 'Desktop built for gaming.', 1350.0, 'https://img.example.com/products/6.jpg', '2020-07-06T10:00:00Z'),
                ('PC Gamer X', 'Desktop built for gaming.', 1350.0, 'https://img.example.com/products/7.jpg', '2020-07-07T10:00:00Z'),
                ('PC Gamer Alfa', 'Desktop built for gaming.', 1850.0, 'https://img.example.com/products/8.jpg', '2020-07-08T10:00:00Z'),
                ('PC Gamer Tera', 'Desktop built for gaming.', 1950.0, 'https://img.example.com/products/9.jpg', '2020-07-09T10:00:00Z'),
                ('PC Gamer Y', 'Desktop built for gaming.', 1700.0, 'https://img.example.com/products/10.jpg', '2020-07-10T10:00:00Z'),
                ('PC Gamer Nitro', 'Desktop built for gaming.', 1450.0, 'https://img.example.com/products/11.jpg', '2020-07-11T10:00:00Z'),
                ('PC Gamer Card', 'Desktop built for gaming.', 1850.0, 'https://img.example.com/products/12.jpg', '2020-07-12T10:00:00Z'),
                ('PC Gamer Plus', 'Desktop built for gaming.', 1350.0, 'https://img.example.com/products/13.jpg', '2020-07-13T10:00:00Z'),
                ('PC Gamer Hera', 'Desktop built for gaming.', 2250.0, 'https://img.example.com/products/14.jpg', '2020-07-14T10:00:00Z'),
                ('PC Gamer Neo', 'Desktop built for gaming.', 2200.0, 'https://img.example.com/products/15.jpg', '2020-07-15T10:00:00Z'),
                ('PC Gamer Max', 'Desktop built for gaming.', 2099.0, 'https://img.example.com/products/16.jpg', '2020-07-16T10:00:00Z'),
                ('PC Gamer Turbo', 'Desktop built for gaming.', 1280.0, 'https://img.example.com/products/17.jpg', '2020-07-17T10:00:00Z'),
                ('PC Gamer Hot', 'Desktop built for gaming.', 1450.0, 'https://img.example.com/products/18.jpg', '2020-07-18T10:00:00Z'),
                ('PC Gamer Ez', 'Desktop built for gaming.', 1750.0, 'https://img.example.com/products/19.jpg', '2020-07-19T10:00:00Z'),
                ('PC Gamer Tr', 'Desktop built for gaming.', 1650.0, 'https://img.example.com/products/20.jpg', '2020-07-20T10:00:00Z'),
                ('PC Gamer Tx', 'Desktop built for gaming.', 1680.0, 'https://img.example.com/products/21.jpg', '2020-07-21T10:00:00Z'),
                ('PC Gamer Er', 'Desktop built for gaming.', 1850.0, 'https://img.example.com/products/22.jpg', '2020-07-22T10:00:00Z'),
                ('PC Gamer Min', 'Desktop built for gaming.', 2250.0, 'https://img.example.com/products/23.jpg', '2020-07-23T10:00:00Z'),
                ('PC Gamer Boo', 'Desktop built for gaming.', 2350.0, 'https://img.example.com/products/24.jpg', '2020-07-24T10:00:00Z'),
                ('PC Gamer Foo', 'Desktop built for gaming.', 4170.0, 'https://img.example.com/products/25.jpg', '2020-07-25T10:00:00Z')
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            INSERT INTO product_categories (product_id, category_id)
            VALUES
                (1, 1), (2, 2), (3, 2), (3, 3), (4, 3), (5, 1), (6, 3), (7, 3),
                (8, 3), (9, 3), (10, 3), (11, 3), (12, 3), (13, 3), (14, 3), (15, 3),
                (16, 3), (17, 3), (18, 3), (19, 3), (20, 3), (21, 3), (22, 3), (23, 3),
                (24, 3), (25, 3)
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                TRUNCATE product_categories, user_categories, products, users, categories
                RESTART IDENTITY
                "#,
            )
            .await?;
        Ok(())
    }
}
