use crate::entities::{allotments, claims, prelude::*, users};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::{TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

/// Demo dataset: the two portal accounts plus sample claims and allotments.
/// Idempotent; existing rows are left alone.
pub async fn seed_demo_data(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("🌱 Seeding demo data...");

    seed_users(db).await?;
    seed_claims(db).await?;
    seed_allotments(db).await?;

    info!("✅ Seeding completed.");
    Ok(())
}

async fn seed_users(db: &DatabaseConnection) -> anyhow::Result<()> {
    let demo_users = [
        (
            "admin@fra.gov.in",
            "admin123",
            "Rajesh Kumar",
            "admin",
            "Ministry of Tribal Affairs",
        ),
        (
            "officer@fra.gov.in",
            "officer123",
            "Priya Sharma",
            "officer",
            "District Forest Office, Sheopur",
        ),
    ];

    for (email, password, name, role, department) in demo_users {
        let exists = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?;

        if exists.is_none() {
            let salt = SaltString::generate(&mut OsRng);
            let password_hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| anyhow::anyhow!("hashing seed password: {}", e))?
                .to_string();

            let model = users::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                email: Set(email.to_string()),
                name: Set(name.to_string()),
                password_hash: Set(password_hash),
                role: Set(role.to_string()),
                department: Set(Some(department.to_string())),
                created_at: Set(Some(Utc::now())),
            };
            model.insert(db).await?;
        }
    }

    Ok(())
}

async fn seed_claims(db: &DatabaseConnection) -> anyhow::Result<()> {
    // (claim_number, claimant, father, village, district, state, area, type, status, year, month, day)
    let rows = [
        (
            "FRA/2023/MP/004521",
            "Ram Prasad Meena",
            Some("Shyam Lal Meena"),
            "Karahal",
            "Sheopur",
            "Madhya Pradesh",
            2.5,
            claims::TYPE_INDIVIDUAL,
            claims::STATUS_UNDER_REVIEW,
            2023,
            3,
            15,
        ),
        (
            "FRA/2023/MP/004522",
            "Sunita Bai Adivasi",
            Some("Mohan Adivasi"),
            "Vijaypur",
            "Sheopur",
            "Madhya Pradesh",
            1.8,
            claims::TYPE_INDIVIDUAL,
            claims::STATUS_APPROVED,
            2023,
            4,
            2,
        ),
        (
            "FRA/2022/MP/003817",
            "Gram Sabha Tiktoli",
            None,
            "Tiktoli",
            "Morena",
            "Madhya Pradesh",
            14.2,
            claims::TYPE_COMMUNITY,
            claims::STATUS_APPROVED,
            2022,
            11,
            21,
        ),
        (
            "FRA/2023/CG/001204",
            "Budhram Gond",
            Some("Itwari Gond"),
            "Bagicha",
            "Jashpur",
            "Chhattisgarh",
            3.1,
            claims::TYPE_INDIVIDUAL,
            claims::STATUS_PENDING,
            2023,
            6,
            9,
        ),
        (
            "FRA/2023/OD/002651",
            "Kamala Majhi",
            Some("Dasarath Majhi"),
            "Similiguda",
            "Koraput",
            "Odisha",
            0.9,
            claims::TYPE_INDIVIDUAL,
            claims::STATUS_REJECTED,
            2023,
            1,
            27,
        ),
        (
            "FRA/2022/MH/005902",
            "Gram Sabha Pachgaon",
            None,
            "Pachgaon",
            "Chandrapur",
            "Maharashtra",
            22.6,
            claims::TYPE_COMMUNITY,
            claims::STATUS_UNDER_REVIEW,
            2022,
            8,
            4,
        ),
    ];

    for (
        claim_number,
        claimant_name,
        father_name,
        village,
        district,
        state,
        area_hectares,
        claim_type,
        status,
        year,
        month,
        day,
    ) in rows
    {
        let exists = Claims::find()
            .filter(claims::Column::ClaimNumber.eq(claim_number))
            .one(db)
            .await?;

        if exists.is_none() {
            let submitted_at = Utc
                .with_ymd_and_hms(year, month, day, 10, 30, 0)
                .single()
                .unwrap_or_else(Utc::now);

            let model = claims::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                claim_number: Set(claim_number.to_string()),
                claimant_name: Set(claimant_name.to_string()),
                father_name: Set(father_name.map(|s| s.to_string())),
                village: Set(village.to_string()),
                district: Set(district.to_string()),
                state: Set(state.to_string()),
                area_hectares: Set(area_hectares),
                claim_type: Set(claim_type.to_string()),
                status: Set(status.to_string()),
                submitted_at: Set(submitted_at),
                updated_at: Set(submitted_at),
            };
            model.insert(db).await?;
        }
    }

    Ok(())
}

async fn seed_allotments(db: &DatabaseConnection) -> anyhow::Result<()> {
    // (allotment_number, holder, village, district, state, survey_number, area, status, year, month, day)
    let rows = [
        (
            "ALT/2021/MP/000873",
            "Ram Prasad Meena",
            "Karahal",
            "Sheopur",
            "Madhya Pradesh",
            "245/2",
            2.5,
            allotments::STATUS_ACTIVE,
            2021,
            7,
            12,
        ),
        (
            "ALT/2020/MP/000610",
            "Harilal Sahariya",
            "Vijaypur",
            "Sheopur",
            "Madhya Pradesh",
            "118/1",
            1.2,
            allotments::STATUS_ACTIVE,
            2020,
            2,
            28,
        ),
        (
            "ALT/2019/CG/000344",
            "Phulmati Baiga",
            "Bagicha",
            "Jashpur",
            "Chhattisgarh",
            "77/3",
            1.6,
            allotments::STATUS_DISPUTED,
            2019,
            9,
            5,
        ),
        (
            "ALT/2022/OD/000129",
            "Dasarath Majhi",
            "Similiguda",
            "Koraput",
            "Odisha",
            "301/4",
            0.8,
            allotments::STATUS_ACTIVE,
            2022,
            12,
            16,
        ),
    ];

    for (
        allotment_number,
        holder_name,
        village,
        district,
        state,
        survey_number,
        area_hectares,
        status,
        year,
        month,
        day,
    ) in rows
    {
        let exists = Allotments::find()
            .filter(allotments::Column::AllotmentNumber.eq(allotment_number))
            .one(db)
            .await?;

        if exists.is_none() {
            let allotted_at = Utc
                .with_ymd_and_hms(year, month, day, 9, 0, 0)
                .single()
                .unwrap_or_else(Utc::now);

            let model = allotments::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                allotment_number: Set(allotment_number.to_string()),
                holder_name: Set(holder_name.to_string()),
                village: Set(village.to_string()),
                district: Set(district.to_string()),
                state: Set(state.to_string()),
                survey_number: Set(survey_number.to_string()),
                area_hectares: Set(area_hectares),
                status: Set(status.to_string()),
                allotted_at: Set(allotted_at),
            };
            model.insert(db).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = database::connect("sqlite::memory:").await.unwrap();
        database::run_migrations(&db).await.unwrap();

        seed_demo_data(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        assert_eq!(Users::find().count(&db).await.unwrap(), 2);
        assert_eq!(Claims::find().count(&db).await.unwrap(), 6);
        assert_eq!(Allotments::find().count(&db).await.unwrap(), 4);
    }
}
