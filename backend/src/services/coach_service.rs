use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::{Coach, NewCoach, NewPackage, Package, UpdateCoach, UpdatePackage};
use crate::repositories::CoachRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service for coach profiles and training packages
pub struct CoachService {
    coach_repo: Arc<CoachRepository>,
}

impl CoachService {
    pub fn new(coach_repo: Arc<CoachRepository>) -> Self {
        Self { coach_repo }
    }

    /// Admin: give a user a coach profile
    pub async fn create_coach(&self, req: NewCoach) -> AppResult<Coach> {
        if req.hourly_rate < Decimal::ZERO {
            return Err(AppError::Validation("hourly_rate cannot be negative".into()));
        }
        let coach = self.coach_repo.create(&req).await?;
        info!("User {} is now coach {}", coach.user_id, coach.id);
        Ok(coach)
    }

    pub async fn remove_coach(&self, id: Uuid) -> AppResult<()> {
        if !self.coach_repo.delete(id).await? {
            return Err(AppError::NotFound("Coach not found".into()));
        }
        info!("Removed coach {}", id);
        Ok(())
    }

    pub async fn list(&self) -> AppResult<Vec<Coach>> {
        Ok(self.coach_repo.list().await?)
    }

    /// Active packages of a coach
    pub async fn list_packages(&self, coach_id: Uuid) -> AppResult<Vec<Package>> {
        self.coach_repo
            .find_by_id(coach_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coach not found".into()))?;
        Ok(self.coach_repo.list_packages_by_coach(coach_id, true).await?)
    }

    /// The caller's own coach profile
    async fn own_profile(&self, user: &AuthUser) -> AppResult<Coach> {
        self.coach_repo
            .find_by_user(user.id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Coach profile required".into()))
    }

    /// Coaches edit their bio and rate; rating is set by admins only
    pub async fn update_profile(&self, user: &AuthUser, mut changes: UpdateCoach) -> AppResult<Coach> {
        let coach = self.own_profile(user).await?;
        if matches!(changes.hourly_rate, Some(r) if r < Decimal::ZERO) {
            return Err(AppError::Validation("hourly_rate cannot be negative".into()));
        }
        if !user.is_admin() {
            changes.rating = None;
        }
        Ok(self.coach_repo.update(coach.id, &changes).await?)
    }

    pub async fn create_package(&self, user: &AuthUser, req: NewPackage) -> AppResult<Package> {
        req.validate().map_err(AppError::Validation)?;
        let coach = self.own_profile(user).await?;
        let package = self.coach_repo.create_package(coach.id, &req).await?;
        info!("Coach {} created package {}", coach.id, package.id);
        Ok(package)
    }

    /// Load a package the caller may manage: their own, or any for admins
    async fn managed_package(&self, user: &AuthUser, id: Uuid) -> AppResult<Package> {
        let package = self
            .coach_repo
            .find_package(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".into()))?;

        if user.is_admin() {
            return Ok(package);
        }

        let coach = self.own_profile(user).await?;
        if package.coach_id != coach.id {
            return Err(AppError::Forbidden("Package belongs to another coach".into()));
        }
        Ok(package)
    }

    pub async fn update_package(&self, user: &AuthUser, id: Uuid, changes: UpdatePackage) -> AppResult<Package> {
        if matches!(changes.sessions, Some(s) if s < 1) {
            return Err(AppError::Validation("A package needs at least one session".into()));
        }
        if matches!(changes.price, Some(p) if p < Decimal::ZERO) {
            return Err(AppError::Validation("Package price cannot be negative".into()));
        }
        let package = self.managed_package(user, id).await?;
        Ok(self.coach_repo.update_package(package.id, &changes).await?)
    }

    pub async fn delete_package(&self, user: &AuthUser, id: Uuid) -> AppResult<()> {
        let package = self.managed_package(user, id).await?;
        self.coach_repo.delete_package(package.id).await?;
        info!("Deleted package {}", package.id);
        Ok(())
    }
}
